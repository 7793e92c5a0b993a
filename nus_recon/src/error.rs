use std::path::PathBuf;
use bruker::ParamError;
use thiserror::Error;
use crate::stage::{Stage, WorkflowStage};

pub type WorkflowResult<T> = std::result::Result<T, WorkflowError>;

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// missing or malformed Bruker metadata
    #[error(transparent)]
    Params(#[from] ParamError),

    #[error("{stage} requires the data to be {required} first (currently {current})")]
    PreconditionNotMet {
        stage: Stage,
        required: WorkflowStage,
        current: WorkflowStage,
    },

    /// only one of the explicit point count targets was supplied
    #[error("invalid parameter combination: {0}")]
    InvalidParameterCombination(String),

    #[error("{script} failed: {reason}")]
    ExternalExecutionFailure { script: String, reason: String },

    #[error("reconstruction failed for {failed} of {total} planes")]
    PlanesFailed { failed: usize, total: usize },

    #[error("workflow state file {path:?} is corrupt: {source}")]
    CorruptStateFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("workflow state file {path:?} has version {found}, this build reads up to {supported}")]
    UnsupportedStateVersion {
        path: PathBuf,
        found: u32,
        supported: u32,
    },

    #[error("cannot serialize workflow state: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("cannot serialize parameters: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
