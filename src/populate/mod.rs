//! Populate command handlers.

pub mod run;

pub use run::{
    describe_templates, load_registry, populate_with_store, run_populate, run_sample,
};

use crate::config::ConnectionArgs;
use clap::Args;
use loader_populate::CommonPopulateArgs;
use std::path::PathBuf;

/// Arguments of the `populate` command.
#[derive(Args, Clone, Debug)]
pub struct PopulateArgs {
    /// Template id (see `griddb-loader templates`)
    #[arg(long)]
    pub template: String,

    /// Target container name (defaults to the template's container)
    #[arg(long)]
    pub container: Option<String>,

    /// Number of rows to write (defaults to the template's row count)
    #[arg(long)]
    pub row_count: Option<u64>,

    /// YAML file with additional templates
    #[arg(long, value_name = "PATH")]
    pub templates_file: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonPopulateArgs,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Arguments of the `sample` command.
#[derive(Args, Clone, Debug)]
pub struct SampleArgs {
    #[command(flatten)]
    pub common: CommonPopulateArgs,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Arguments of the `templates` command.
#[derive(Args, Clone, Debug, Default)]
pub struct TemplatesArgs {
    /// YAML file with additional templates
    #[arg(long, value_name = "PATH")]
    pub templates_file: Option<PathBuf>,
}
