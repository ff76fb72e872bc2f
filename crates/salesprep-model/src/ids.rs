#![deny(unsafe_code)]

use std::fmt;

use crate::ModelError;

const PROVISIONAL_PREFIX: &str = "Unknown_Schema_";

/// Identifier of a known or provisional table layout, e.g. `Schema_5`.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SchemaId(String);

impl SchemaId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(ModelError::InvalidSchemaId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Id of the `n`-th shipped layout, e.g. `Schema_5`.
    pub fn known(n: usize) -> Self {
        Self(format!("Schema_{n}"))
    }

    /// Mints the provisional id for the `seq`-th unrecognized signature of a run.
    pub fn provisional(seq: usize) -> Self {
        Self(format!("{PROVISIONAL_PREFIX}{seq}"))
    }

    pub fn is_provisional(&self) -> bool {
        self.0.starts_with(PROVISIONAL_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
