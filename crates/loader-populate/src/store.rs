//! The store boundary the pipeline writes through.

use async_trait::async_trait;
use loader_core::{Batch, ContainerSchema};
use thiserror::Error;

/// Errors reported by a store implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Transport-level failure (unreachable host, broken connection).
    #[error("Connection error: {0}")]
    Connection(String),

    /// The store answered but refused the request.
    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The connection was already closed.
    #[error("Store connection is closed")]
    Closed,

    /// A request or response body could not be encoded or decoded.
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// A connected, schema-aware container store.
///
/// Calls are issued strictly one at a time by a single pipeline run. A store
/// must treat a batch that carries no rows as a no-op.
#[async_trait]
pub trait ContainerStore: Send {
    /// Whether a container with this name exists.
    async fn container_exists(&mut self, name: &str) -> Result<bool, StoreError>;

    /// Create a container with the given schema.
    async fn create_container(
        &mut self,
        name: &str,
        schema: &ContainerSchema,
    ) -> Result<(), StoreError>;

    /// Drop a container.
    async fn drop_container(&mut self, name: &str) -> Result<(), StoreError>;

    /// Write every row of the batch. The call succeeds or fails as a whole.
    async fn write_batch(&mut self, batch: Batch) -> Result<(), StoreError>;

    /// Release the connection.
    async fn close(&mut self) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: ContainerStore + ?Sized> ContainerStore for Box<S> {
    async fn container_exists(&mut self, name: &str) -> Result<bool, StoreError> {
        (**self).container_exists(name).await
    }

    async fn create_container(
        &mut self,
        name: &str,
        schema: &ContainerSchema,
    ) -> Result<(), StoreError> {
        (**self).create_container(name, schema).await
    }

    async fn drop_container(&mut self, name: &str) -> Result<(), StoreError> {
        (**self).drop_container(name).await
    }

    async fn write_batch(&mut self, batch: Batch) -> Result<(), StoreError> {
        (**self).write_batch(batch).await
    }

    async fn close(&mut self) -> Result<(), StoreError> {
        (**self).close().await
    }
}
