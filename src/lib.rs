//! griddb-loader library
//!
//! Loads synthetic sample data into GridDB containers through the GridDB Web
//! API. Each run resets the target container, generates rows from a
//! template schema and writes them in bounded batches.
//!
//! # Templates
//!
//! - `multiple-time-columns` - collection `Multiple_Time_Columns`, 10 rows
//! - `one-thousand-rows` - time series `one_thousand_rows`, 1000 rows
//! - `multiple-type` - time series `Multiple_Type`, 500 rows
//!
//! More templates can be loaded from YAML with `--templates-file`.
//!
//! # CLI Usage
//!
//! ```bash
//! # The three sample runs, in order
//! griddb-loader sample --griddb-url http://localhost:8080 --cluster myCluster
//!
//! # One run with overrides
//! griddb-loader populate --template multiple-type --container my_types \
//!   --row-count 10000 --batch-size 500 --seed 42
//!
//! # Generate without contacting GridDB
//! griddb-loader populate --template one-thousand-rows --dry-run
//! ```

pub mod config;
pub mod populate;

pub use config::{ConnectionArgs, ConnectionFile};
pub use populate::{PopulateArgs, SampleArgs, TemplatesArgs};
