//! TOML connection file.
//!
//! ```toml
//! url = "http://griddb.internal:8080"
//! cluster = "myCluster"
//! database = "public"
//! user = "admin"
//! password = "admin"
//! timeout = "30s"
//! ```
//!
//! Every key is optional; missing keys fall through to the built-in defaults.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Connection settings read from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionFile {
    pub url: Option<String>,
    pub cluster: Option<String>,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub timeout: Option<String>,
}

impl ConnectionFile {
    /// Parse settings from TOML text.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Invalid connection file")
    }

    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read connection file {path:?}"))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {path:?}"))
    }
}
