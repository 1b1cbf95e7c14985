use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use crate::errors::AppError;
use crate::models::watermark::WatermarkState;

/// Persistence for the single watermark record.
///
/// There is no locking: two processes sharing a record race on load/save.
pub trait StateStore: Send + Sync {
    /// A missing record yields `{0, 0}`; an unreadable one is `StateCorrupt`.
    fn load(&self) -> Result<WatermarkState, AppError>;
    /// Replace the record as a whole.
    fn save(&self, state: &WatermarkState) -> Result<(), AppError>;
}

/// Compact JSON file, replaced atomically through a sibling temp file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(".");
        name.push(self.path.file_name().unwrap_or(OsStr::new("state")));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Directory holding the record; a bare file name lives in `.`.
    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    // Persist the rename itself, not just the file contents.
    #[cfg(unix)]
    fn sync_parent(&self) -> std::io::Result<()> {
        File::open(self.parent_dir())?.sync_all()
    }

    #[cfg(not(unix))]
    fn sync_parent(&self) -> std::io::Result<()> {
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> AppError {
        AppError::StateIo {
            path: self.path.clone(),
            source,
        }
    }

    fn corrupt(&self, reason: impl Into<String>) -> AppError {
        AppError::StateCorrupt {
            path: self.path.clone(),
            reason: reason.into(),
            price: None,
        }
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<WatermarkState, AppError> {
        let body = match fs::read_to_string(&self.path) {
            Ok(body) => body,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::info!("No state at {}, starting fresh", self.path.display());
                return Ok(WatermarkState::default());
            }
            Err(err) if err.kind() == ErrorKind::InvalidData => {
                return Err(self.corrupt(err.to_string()));
            }
            Err(err) => return Err(self.io_error(err)),
        };

        let state: WatermarkState =
            serde_json::from_str(&body).map_err(|err| self.corrupt(err.to_string()))?;

        if !state.is_valid() {
            return Err(self.corrupt(format!(
                "watermarks must be non-negative, got high={} low={}",
                state.high, state.low
            )));
        }

        Ok(state)
    }

    fn save(&self, state: &WatermarkState) -> Result<(), AppError> {
        let body = serde_json::to_string(state)
            .map_err(|err| self.io_error(std::io::Error::new(ErrorKind::InvalidData, err)))?;
        let temp = self.temp_path();

        let mut file = File::create(&temp).map_err(|err| self.io_error(err))?;
        file.write_all(body.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|err| self.io_error(err))?;
        drop(file);

        fs::rename(&temp, &self.path).map_err(|err| {
            let _ = fs::remove_file(&temp);
            self.io_error(err)
        })?;
        self.sync_parent().map_err(|err| self.io_error(err))?;

        tracing::debug!("Saved state {:?} to {}", state, self.path.display());
        Ok(())
    }
}
