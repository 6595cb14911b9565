#![forbid(unsafe_code)]

use std::path::PathBuf;

use swipe_core::ConfigError;
use thiserror::Error;

pub const EXIT_IO: i32 = 2;
pub const EXIT_PARSE: i32 = 3;
pub const EXIT_CONFIG: i32 = 4;
pub const EXIT_DIVERGED: i32 = 5;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("settle did not come to rest within {frames} frames (step {step})")]
    SettleDiverged { step: usize, frames: usize },
}

impl HarnessError {
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) | Self::Read { .. } => EXIT_IO,
            Self::Json(_) | Self::Parse { .. } => EXIT_PARSE,
            Self::Config(_) => EXIT_CONFIG,
            Self::SettleDiverged { .. } => EXIT_DIVERGED,
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
