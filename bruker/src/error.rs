use std::path::PathBuf;
use thiserror::Error;

pub type ParamResult<T> = std::result::Result<T, ParamError>;

#[derive(Debug, Error)]
pub enum ParamError {
    /// one of the six files that make up a Bruker 3D data set is absent
    #[error("data directory does not seem to contain Bruker 3D data: {0:?} not found")]
    MissingMetadataFile(PathBuf),

    /// a required field is missing or cannot be parsed
    #[error("malformed value for {key} in {file:?}: {reason}")]
    MalformedValue {
        file: PathBuf,
        key: String,
        reason: String,
    },

    #[error("requested {requested} samples but the sample list only has {available}")]
    SampleCountExceedsList { requested: usize, available: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
