//! pgnsplit binary entry point.
//!
//! This is a thin wrapper around the pgnsplit library that:
//! 1. Parses command-line arguments
//! 2. Initializes logging
//! 3. Validates configuration
//! 4. Runs the split with a progress bar on stderr
//!
//! For library usage, see the pgnsplit crate documentation.

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use pgnsplit::{SplitConfig, Splitter};

fn main() -> Result<()> {
    let config = SplitConfig::from_args();

    // RUST_LOG wins over --log-level when it is set
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_level.as_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    config.validate()?;

    let progress = if config.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };

    let summary = Splitter::new(config.run_config())
        .with_progress(&progress)
        .split(&config.input, &config.output_folder)
        .inspect_err(|err| {
            if err.is_inconsistency() {
                tracing::error!(
                    "{} changed while it was being split; rerun on a copy that is not being written to",
                    config.input.display()
                );
            }
        })
        .with_context(|| format!("failed to split {}", config.input.display()))?;

    tracing::info!(
        "Split {} games ({} bytes) into {} batches",
        summary.records,
        summary.bytes,
        summary.batches
    );

    Ok(())
}
