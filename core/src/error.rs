use thiserror::Error;

// Failures surfaced by the terrain pipeline.
// A flat field is not an error: the normalizer recovers it locally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TerrainError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, TerrainError>;

impl TerrainError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        TerrainError::InvalidParameter(msg.into())
    }
}
