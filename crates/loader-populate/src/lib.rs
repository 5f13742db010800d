//! Batched container population for griddb-loader.
//!
//! This crate drives one population run: it resets the target container,
//! generates rows with [`loader_generator::RowGenerator`], groups them into
//! bounded batches and writes each batch through a [`ContainerStore`].
//! The store is closed exactly once per run, on success and on failure.
//!
//! [`MemoryStore`] implements the same trait in memory; it backs `--dry-run`
//! and the tests.

pub mod args;
pub mod buffer;
pub mod error;
pub mod memory;
pub mod pipeline;
pub mod provision;
pub mod store;

pub use args::CommonPopulateArgs;
pub use buffer::{BatchBuffer, BufferFull, DEFAULT_BATCH_CAPACITY};
pub use error::PopulateError;
pub use memory::{FailPoint, MemoryStore, StoreCall, StoredContainer};
pub use pipeline::{LoadPipeline, PopulateMetrics, PopulateRequest};
pub use provision::{ContainerProvisioner, ProvisionOutcome};
pub use store::{ContainerStore, StoreError};
