use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    #[error("invalid start pattern for block '{name}': {message}")]
    InvalidPattern { name: String, message: String },

    #[error("block '{name}' ends at a delimiter but its start pattern has no capture group")]
    MissingCaptureGroup { name: String },
}

impl BlockError {
    /// Name of the block definition the error belongs to.
    pub fn name(&self) -> &str {
        match self {
            BlockError::InvalidPattern { name, .. }
            | BlockError::MissingCaptureGroup { name } => name,
        }
    }
}
