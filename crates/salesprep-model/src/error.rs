use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid schema id: {0:?}")]
    InvalidSchemaId(String),
    #[error("unknown NHS/private tag: {0:?}")]
    UnknownTag(String),
    #[error("unknown combination bucket: {0:?}")]
    UnknownBucket(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
