//! Error types for container population.

use crate::buffer::BufferFull;
use crate::store::StoreError;
use loader_core::SchemaError;
use loader_generator::GeneratorError;
use thiserror::Error;

/// Errors that abort a population run.
///
/// Every variant is fatal to the run; nothing is retried.
#[derive(Error, Debug)]
pub enum PopulateError {
    /// Unknown template or invalid schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Row generation failed.
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// The container could not be created or reset.
    #[error("Failed to provision container '{container}': {source}")]
    ProvisionFailure {
        container: String,
        source: StoreError,
    },

    /// A batch write was rejected or failed in transit.
    #[error("Failed to write batch {batch} to container '{container}': {source}")]
    WriteFailure {
        container: String,
        batch: u64,
        source: StoreError,
    },

    /// Connecting to or releasing the store failed.
    #[error("Connection failure: {0}")]
    ConnectionFailure(#[source] StoreError),

    /// A row was pushed into a full buffer.
    #[error(transparent)]
    Buffer(#[from] BufferFull),
}

impl PopulateError {
    /// Name of the error kind, for reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Schema(SchemaError::UnknownTemplate(_)) => "UnknownTemplate",
            Self::Schema(SchemaError::SchemaMismatch { .. }) => "SchemaMismatch",
            Self::Schema(_) => "TemplateFile",
            Self::Generator(_) => "SchemaMismatch",
            Self::ProvisionFailure { .. } => "ProvisionFailure",
            Self::WriteFailure { .. } => "WriteFailure",
            Self::ConnectionFailure(_) => "ConnectionFailure",
            Self::Buffer(_) => "BufferOverflow",
        }
    }
}
