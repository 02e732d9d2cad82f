use crate::shared::fs_atomic::atomic_write_file;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

pub const ERROR_LOG_DIR_ENV: &str = "CHANNELSMITH_ERROR_LOG_DIR";

#[derive(Debug, thiserror::Error)]
pub enum ErrorLogError {
    #[error("failed to serialize error log: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write error log {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    ChannelCreationError,
    ChannelExistsWarning,
    MemberNotFound,
    InviteError,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub kind: ErrorKind,
    pub subject: String,
    pub detail: Value,
}

impl ErrorEntry {
    pub fn channel_exists(name: &str) -> Self {
        Self {
            kind: ErrorKind::ChannelExistsWarning,
            subject: name.to_string(),
            detail: Value::String(format!(
                "Channel {name} already exists. Will not create a new one"
            )),
        }
    }

    pub fn member_not_found(name: &str) -> Self {
        Self {
            kind: ErrorKind::MemberNotFound,
            subject: name.to_string(),
            detail: Value::String(format!("Member with real name {name} not found in team")),
        }
    }

    pub fn channel_creation(name: &str, response: Value) -> Self {
        Self {
            kind: ErrorKind::ChannelCreationError,
            subject: name.to_string(),
            detail: response,
        }
    }

    pub fn invite(member_id: &str, response: Value) -> Self {
        Self {
            kind: ErrorKind::InviteError,
            subject: member_id.to_string(),
            detail: response,
        }
    }
}

/// Append-only record of everything that went wrong during one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorLog {
    entries: Vec<ErrorEntry>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ErrorEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_of(&self, kind: ErrorKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    pub fn to_json_pretty(&self) -> Result<String, ErrorLogError> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Writes the log as a JSON array to `errorlog_<timestamp>.json` in `dir`.
    pub fn flush(&self, dir: &Path, at: DateTime<Utc>) -> Result<PathBuf, ErrorLogError> {
        let path = dir.join(error_log_file_name(at));
        let body = self.to_json_pretty()?;
        atomic_write_file(&path, body.as_bytes()).map_err(|source| ErrorLogError::Write {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), entries = self.len(), "wrote error log");
        Ok(path)
    }
}

pub fn error_log_file_name(at: DateTime<Utc>) -> String {
    format!("errorlog_{}.json", at.format("%Y%m%dT%H%M%S%.3fZ"))
}

pub fn resolve_error_log_dir() -> PathBuf {
    std::env::var(ERROR_LOG_DIR_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}
