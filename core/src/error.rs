use thiserror::Error;

#[derive(Debug, Error)]
pub enum FatlensError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Short read: expected {expected} bytes at offset {offset:#x}")]
    ShortRead { offset: u64, expected: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Corrupt filesystem: {0}")]
    CorruptFilesystem(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl FatlensError {
    /// True for errors that come from the image handle rather than its contents.
    pub fn is_io(&self) -> bool {
        matches!(self, FatlensError::Io(_) | FatlensError::ShortRead { .. })
    }
}
