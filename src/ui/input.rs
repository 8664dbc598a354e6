// src/ui/input.rs
// Turns typed command lines into dashboard messages

use crate::error::{AppError, AppResult};
use crate::messages::Message;
use crate::models::{StatusAction, Tab};

pub const HELP: &str = "\
Commands:
  today | upcoming | past | all | date   switch tab
  day <n>                                pick a day of the shown month
  month next | month prev                move the calendar
  search [text]                          filter by patient or doctor (empty clears)
  status <all|confirmed|scheduled|...>   status dropdown
  mode <all|in-person|video>             mode dropdown
  confirm <id> | cancel <id>             change an appointment's status
  show | help | quit";

/// What a typed line asks for.
#[derive(Debug, Clone)]
pub enum Input {
    Message(Message),
    Show,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> AppResult<Input> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let input = match command.to_lowercase().as_str() {
        "" | "show" => Input::Show,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        "today" | "upcoming" | "past" | "all" | "date" => {
            Input::Message(Message::TabSelected(command.parse::<Tab>()?))
        }
        "day" => {
            let day = rest
                .parse::<u32>()
                .map_err(|_| AppError::invalid_input(format!("'{}' is not a day number", rest)))?;
            Input::Message(Message::DaySelected(day))
        }
        "month" => {
            let delta = match rest.to_lowercase().as_str() {
                "next" | "+" => 1,
                "prev" | "previous" | "-" => -1,
                other => other.parse::<i32>().map_err(|_| {
                    AppError::invalid_input("Use 'month next' or 'month prev'")
                })?,
            };
            Input::Message(Message::MonthChanged(delta))
        }
        "search" => Input::Message(Message::SearchChanged(rest.to_string())),
        "status" => Input::Message(Message::StatusFilterChanged(rest.parse()?)),
        "mode" => Input::Message(Message::ModeFilterChanged(rest.parse()?)),
        "confirm" | "cancel" => {
            if rest.is_empty() {
                return Err(AppError::invalid_input(format!("Usage: {} <id>", command)));
            }
            let action = if command.eq_ignore_ascii_case("confirm") {
                StatusAction::Confirm
            } else {
                StatusAction::Cancel
            };
            Input::Message(Message::StatusActionRequested {
                id: rest.to_string(),
                action,
            })
        }
        other => {
            return Err(AppError::invalid_input(format!(
                "Unknown command '{}', type 'help'",
                other
            )))
        }
    };
    Ok(input)
}
