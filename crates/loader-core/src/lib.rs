//! Core types for griddb-loader.
//!
//! This crate provides the foundational types used across the loader:
//!
//! - [`ContainerSchema`] / [`ColumnSpec`] - fixed column layouts of containers
//! - [`ValueStrategy`] - per-column rules for synthetic values
//! - [`Value`], [`Row`], [`Batch`] - generated data on its way to the store
//! - [`SchemaRegistry`] - template id to schema lookup
//!
//! # Architecture
//!
//! ```text
//! loader-core (this crate)
//!    │
//!    ├─── loader-generator   (rows from schemas)
//!    ├─── loader-populate    (buffering, provisioning, pipeline)
//!    └─── griddb-webapi      (Web API store)
//! ```
//!
//! # Example
//!
//! ```rust
//! use loader_core::{ContainerKind, SchemaRegistry};
//!
//! let registry = SchemaRegistry::builtin();
//! let schema = registry.schema_for("one-thousand-rows").unwrap();
//! assert_eq!(schema.kind, ContainerKind::TimeSeries);
//! assert!(registry.schema_for("nope").is_err());
//! ```

pub mod registry;
pub mod schema;
pub mod values;

// Re-exports for convenience
pub use registry::{SchemaRegistry, Template, TemplateDefinition};
pub use schema::{
    ColumnSpec, ColumnType, ContainerKind, ContainerSchema, ContainerSchemaBuilder, SchemaError,
    UnsupportedColumnType, ValueStrategy,
};
pub use values::{Batch, Row, Value};
