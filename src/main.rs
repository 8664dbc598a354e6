// Front Desk - appointment management dashboard
// Main entry point for the terminal front end

use anyhow::Context;
use log::{error, info, warn};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, Sender};
use tokio_util::sync::CancellationToken;

use frontdesk::service::AppointmentService;
use frontdesk::ui::{parse_command, render_dashboard, Input, HELP};
use frontdesk::utils::logging::{init_logging, log_error_with_context};
use frontdesk::{AppConfig, AppointmentStore, Dashboard, InMemoryAppointmentService, Message, Task};

/// Runs each task on the runtime and forwards its message back to the loop.
fn spawn_tasks(tasks: Vec<Task>, sender: &Sender<Message>, shutdown: &CancellationToken) {
    for task in tasks {
        let sender = sender.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                message = task => {
                    let _ = sender.send(message).await;
                }
            }
        });
    }
}

fn apply(
    dashboard: &mut Dashboard,
    message: Message,
    sender: &Sender<Message>,
    shutdown: &CancellationToken,
) {
    let tasks = dashboard.update(message);
    spawn_tasks(tasks, sender, shutdown);
    println!("{}", render_dashboard(dashboard));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!("Starting Front Desk dashboard");

    let config = AppConfig::from_env().context("Invalid configuration")?;
    let store = match &config.seed_file {
        Some(path) => AppointmentStore::load_from_file(path)
            .with_context(|| format!("Failed to load appointments from {}", path.display()))?,
        None => AppointmentStore::seeded().context("Built-in appointments are malformed")?,
    };

    let service = Arc::new(InMemoryAppointmentService::new(store, config.latency));
    let health = service.health().await;
    info!("{} is {}", health.service, health.status);

    let (mut dashboard, tasks) = Dashboard::new(service, config.clock(), config.retry.clone());

    let (sender, mut receiver) = mpsc::channel::<Message>(100);
    let shutdown = CancellationToken::new();

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, shutting down");
                shutdown.cancel();
            }
        });
    }

    spawn_tasks(tasks, &sender, &shutdown);
    println!("{}", HELP);
    println!("{}", render_dashboard(&dashboard));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            Some(message) = receiver.recv() => {
                apply(&mut dashboard, message, &sender, &shutdown);
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                };
                match parse_command(&line) {
                    Ok(Input::Quit) => break,
                    Ok(Input::Help) => println!("{}", HELP),
                    Ok(Input::Show) => println!("{}", render_dashboard(&dashboard)),
                    Ok(Input::Message(message)) => {
                        apply(&mut dashboard, message, &sender, &shutdown);
                    }
                    Err(e) => {
                        warn!("Rejected input '{}'", line.trim());
                        log_error_with_context(&e, "input");
                        println!("{}", e.to_safe_string());
                    }
                }
            }
        }
    }

    shutdown.cancel();
    info!("Front Desk stopped");
    Ok(())
}
