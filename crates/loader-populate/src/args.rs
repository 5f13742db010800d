//! Common CLI argument definitions shared by populate commands.

use clap::Args;
use std::num::NonZeroUsize;

/// Common arguments shared by every populate command.
///
/// Used by both the single-container `populate` command and the `sample`
/// command so that batching, seeding and dry-run behave the same way.
#[derive(Args, Clone, Debug)]
pub struct CommonPopulateArgs {
    /// Maximum rows per batch write
    #[arg(long, default_value = "1000")]
    pub batch_size: NonZeroUsize,

    /// Random seed for reproducible values (omit for a fresh seed per run)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Step between consecutive row timestamps, in milliseconds
    #[arg(long, default_value = "1000")]
    pub decrease_unit_ms: i64,

    /// Dry-run mode: generate rows into an in-memory store instead of GridDB
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        common: CommonPopulateArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.common.batch_size.get(), 1000);
        assert_eq!(cli.common.seed, None);
        assert_eq!(cli.common.decrease_unit_ms, 1000);
        assert!(!cli.common.dry_run);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let result = TestCli::try_parse_from(["test", "--batch-size", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides() {
        let cli = TestCli::parse_from(["test", "--batch-size", "250", "--seed", "7", "--dry-run"]);
        assert_eq!(cli.common.batch_size.get(), 250);
        assert_eq!(cli.common.seed, Some(7));
        assert!(cli.common.dry_run);
    }
}
