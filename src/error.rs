use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn operation_failed<S: Into<String>>(msg: S) -> Self {
        Self::OperationFailed(msg.into())
    }

    /// Whether retrying the same request could plausibly succeed.
    ///
    /// Only the network class is transient; a missing record or a bad
    /// query will fail the same way every time.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    pub fn is_pii_safe(&self) -> bool {
        match self {
            Self::Serialization(_) | Self::Io(_) | Self::Anyhow(_) => false,
            Self::NotFound(_)
            | Self::InvalidInput(_)
            | Self::Network(_)
            | Self::Config(_)
            | Self::OperationFailed(_) => true,
        }
    }

    pub fn to_safe_string(&self) -> String {
        if self.is_pii_safe() {
            self.to_string()
        } else {
            match self {
                Self::Serialization(_) => "Could not read appointment data".to_string(),
                Self::Io(_) => "File operation failed".to_string(),
                Self::Anyhow(_) => "Operation failed".to_string(),
                _ => self.to_string(),
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_network_class_is_transient() {
        assert!(AppError::network("connection reset").is_transient());
        assert!(!AppError::not_found("Appointment 42").is_transient());
        assert!(!AppError::invalid_input("bad date").is_transient());

        let timed_out = AppError::from(std::io::Error::new(std::io::ErrorKind::TimedOut, "slow"));
        assert!(timed_out.is_transient());
        let missing = AppError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(!missing.is_transient());
    }

    #[test]
    fn test_safe_string_hides_parser_details() {
        let parse_err = serde_json::from_str::<Vec<u32>>("{not json").unwrap_err();
        let err = AppError::from(parse_err);
        assert!(!err.is_pii_safe());
        assert_eq!(err.to_safe_string(), "Could not read appointment data");

        let not_found = AppError::not_found("Appointment 42");
        assert_eq!(not_found.to_safe_string(), "Not found: Appointment 42");
    }
}
