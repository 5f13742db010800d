//! Synthetic row generator for griddb-loader.
//!
//! This crate provides the [`RowGenerator`] which produces one row per cursor
//! index for a [`ContainerSchema`](loader_core::ContainerSchema). The random
//! source is always passed in by the caller, so a seeded `StdRng` gives
//! reproducible value shapes in tests.
//!
//! # Architecture
//!
//! ```text
//! ContainerSchema + cursor index + &mut Rng
//!        │
//!        ▼
//! ┌──────────────────┐
//! │   RowGenerator   │
//! │                  │
//! │  - base_time     │
//! │  - decrease_unit │
//! └────────┬─────────┘
//!          │
//!          ▼
//!    Row [Value; width]
//! ```
//!
//! # Example
//!
//! ```rust
//! use loader_core::Template;
//! use loader_generator::RowGenerator;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let schema = Template::MultipleType.schema();
//! let generator = RowGenerator::starting_now();
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! let row = generator.next(&schema, 0, &mut rng).unwrap();
//! assert_eq!(row.len(), schema.width());
//! ```
//!
//! # Strategies
//!
//! - `cursor` - `base_time - cursor * decrease_unit`
//! - `uniform_int` - integer in `[0, bound)` plus `bias`
//! - `token` - `prefix` plus a number in `[base, base + spread)`
//! - `alphanumeric` - fixed-length string over the 62-character alphabet
//! - `coin_flip`, `unit_double`, `unit_float`

pub mod generator;
pub mod generators;

// Re-exports for convenience
pub use generator::{GeneratorError, RowGenerator, RowIterator, DEFAULT_DECREASE_UNIT_MS};
