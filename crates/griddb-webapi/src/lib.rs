//! GridDB Web API store for griddb-loader.
//!
//! [`GridDbClient`] implements [`ContainerStore`](loader_populate::ContainerStore)
//! with plain HTTP/JSON requests against
//! `{url}/griddb/v2/{cluster}/dbs/{database}`:
//!
//! - `GET  /checkConnection` when connecting
//! - `GET  /containers/{name}/info` to test for a container (404 means absent)
//! - `POST /containers` to create one
//! - `DELETE /containers` with `["name"]` to drop one
//! - `PUT  /containers/{name}/rows` with `[[...], ...]` to write rows
//!
//! All requests use HTTP basic auth.

pub mod client;
pub mod config;
pub mod encode;

pub use client::GridDbClient;
pub use config::{mask_password, WebApiConfig};
pub use encode::{ColumnInfo, ContainerInfo, TIMESTAMP_FORMAT};
