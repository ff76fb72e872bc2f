use thiserror::Error;

use salesprep_model::{ModelError, SchemaId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("schema {id} registered with an empty signature")]
    EmptySignature { id: SchemaId },
    #[error("schema {id} registered with an empty path prefix")]
    EmptyPathPrefix { id: SchemaId },
    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
