use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("network error: {0}")]
    Network(String),
    #[error("checksum mismatch for {}: expected {expected}, got {actual}", .path.display())]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
    #[error("failed to probe installed application: {0}")]
    Probe(String),
    #[error("could not quit {process}: {detail}")]
    QuitFailure { process: String, detail: String },
    #[error("disk image mount error: {0}")]
    Mount(String),
    #[error("failed to install application bundle: {0}")]
    Copy(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl InstallError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::ChecksumMismatch { .. } => "checksum-mismatch",
            Self::Probe(_) => "probe",
            Self::QuitFailure { .. } => "quit-failure",
            Self::Mount(_) => "mount",
            Self::Copy(_) => "copy",
            Self::Unsupported(_) => "unsupported",
            Self::Config(_) => "config",
        }
    }
}

pub fn chain_message(err: &anyhow::Error) -> String {
    format!("{err:#}")
}
