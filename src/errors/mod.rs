use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error("price fetch failed: {0}")]
    Fetch(String),
    #[error("state file {} is corrupt: {reason}", .path.display())]
    StateCorrupt {
        path: PathBuf,
        reason: String,
        /// Price fetched for the aborted run, kept for diagnosis
        price: Option<f64>,
    },
    #[error("state file {} could not be accessed: {source}", .path.display())]
    StateIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("notification failed: {0}")]
    Notify(String),
}

impl AppError {
    /// Only notification failures let a run continue.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AppError::Notify(_))
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            AppError::Config(_) => ExitCode::from(2),
            _ => ExitCode::FAILURE,
        }
    }

    /// Attach the run's fetched price to a corrupt-state error.
    pub fn with_fetched_price(self, fetched: f64) -> Self {
        match self {
            AppError::StateCorrupt { path, reason, .. } => AppError::StateCorrupt {
                path,
                reason,
                price: Some(fetched),
            },
            other => other,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        AppError::Fetch(error.to_string())
    }
}
