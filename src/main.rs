//! Command-line interface for griddb-loader
//!
//! # Usage Examples
//!
//! ```bash
//! # Load the three sample containers
//! griddb-loader sample
//!
//! # Populate one container from a template
//! griddb-loader populate --template one-thousand-rows --row-count 5000
//!
//! # Connection settings from a file, password from the environment
//! GRIDDB_PASSWORD=secret griddb-loader populate --template multiple-type \
//!   --config griddb.toml
//!
//! # List templates and their columns
//! griddb-loader templates --templates-file extra.yaml
//! ```

use clap::{Parser, Subcommand};
use griddb_loader::populate::{describe_templates, load_registry, run_populate, run_sample};
use griddb_loader::{PopulateArgs, SampleArgs, TemplatesArgs};
use loader_populate::PopulateError;

#[derive(Parser)]
#[command(name = "griddb-loader")]
#[command(about = "Load synthetic sample data into GridDB containers")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Populate one container from a template
    Populate(PopulateArgs),

    /// Run every built-in template with its sample settings
    Sample(SampleArgs),

    /// List available templates
    Templates(TemplatesArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        match e.downcast_ref::<PopulateError>() {
            Some(pe) => eprintln!("Error ({}): {e:#}", pe.kind()),
            None => eprintln!("Error: {e:#}"),
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing, defaulting to info when RUST_LOG is unset
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Populate(args) => {
            run_populate(args).await?;
        }
        Commands::Sample(args) => {
            run_sample(args).await?;
        }
        Commands::Templates(args) => {
            let registry = load_registry(args.templates_file.as_deref())?;
            print!("{}", describe_templates(&registry));
        }
    }

    Ok(())
}
