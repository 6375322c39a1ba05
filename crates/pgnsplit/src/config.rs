//! Run configuration.
//!
//! [`SplitConfig`] is the command-line surface: it is parsed by clap from
//! arguments and `PGNSPLIT_*` environment variables, and [`validate`] checks
//! the filesystem contract at the boundary (input readable, output folder
//! writable). [`RunConfig`] is the immutable subset the pipeline consumes.
//!
//! # Example
//!
//! ```no_run
//! use pgnsplit::SplitConfig;
//!
//! let config = SplitConfig::from_args();
//! config.validate().expect("Invalid configuration");
//!
//! let run = config.run_config();
//! println!("{} games per file", run.chunk_size);
//! ```
//!
//! [`validate`]: SplitConfig::validate

use crate::batch::{DEFAULT_CHUNK_SIZE, DEFAULT_EXTENSION};
use crate::error::{SplitError, SplitResult};
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;

/// Logging verbosity accepted on the command line
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// Every boundary found
    Trace,
    /// Every batch written
    Debug,
    /// Run start and summary
    Info,
    /// Warnings only
    Warn,
    /// Errors only
    Error,
}

impl LogLevel {
    /// Filter directive understood by `tracing_subscriber::EnvFilter`
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Command-line configuration for one split.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pgnsplit",
    about = "Streaming PGN splitter",
    long_about = "Streaming PGN splitter.\n\n\
        Reads INPUT and splits it into separate PGN files written to OUTPUT_FOLDER. \
        Output files are named 0.pgn, 1.pgn, ..., n.pgn.\n\n\
        By default all games are exported, but the number of games exported can be \
        limited using --games, and scanning can be offset using --skip.",
    version
)]
pub struct SplitConfig {
    /// Input file to be split into separate PGN files
    pub input: PathBuf,

    /// Output folder for PGN files
    pub output_folder: PathBuf,

    /// Number of games to skip from INPUT before producing output
    #[arg(long, env = "PGNSPLIT_SKIP")]
    pub skip: Option<u64>,

    /// Number of games to extract from INPUT
    #[arg(long, env = "PGNSPLIT_GAMES")]
    pub games: Option<u64>,

    /// Number of games exported to each file
    #[arg(
        long,
        env = "PGNSPLIT_CHUNKED",
        default_value_t = DEFAULT_CHUNK_SIZE as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub chunked: u64,

    /// Dry run the operation, thereby not producing any files
    #[arg(long, env = "PGNSPLIT_DRY_RUN")]
    pub dry_run: bool,

    /// Extension given to output files
    #[arg(long, env = "PGNSPLIT_EXTENSION", default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Hide progress bars
    #[arg(short, long, env = "PGNSPLIT_QUIET")]
    pub quiet: bool,

    /// Set the logging level (RUST_LOG takes precedence when set)
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

impl SplitConfig {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Immutable per-run configuration
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            skip: self.skip,
            games: self.games,
            chunk_size: usize::try_from(self.chunked).unwrap_or(usize::MAX),
            dry_run: self.dry_run,
            extension: self.extension.clone(),
        }
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// - `InputAccess` if the input is missing, not a regular file, or cannot
    ///   be opened for reading
    /// - `OutputFolder` if the output folder is missing, not a directory, or
    ///   read-only
    /// - `InvalidConfig` if the run configuration is inconsistent
    pub fn validate(&self) -> SplitResult<()> {
        let input_err = |source| SplitError::InputAccess {
            path: self.input.clone(),
            source,
        };
        let metadata = std::fs::metadata(&self.input).map_err(input_err)?;
        if !metadata.is_file() {
            return Err(input_err(std::io::Error::other("not a regular file")));
        }
        File::open(&self.input).map_err(input_err)?;

        let output_err = |reason: &str| SplitError::OutputFolder {
            path: self.output_folder.clone(),
            reason: reason.to_string(),
        };
        let metadata = std::fs::metadata(&self.output_folder)
            .map_err(|err| output_err(&err.to_string()))?;
        if !metadata.is_dir() {
            return Err(output_err("not a directory"));
        }
        // Permission bits alone do not say whether this process may write here
        tempfile::NamedTempFile::new_in(&self.output_folder)
            .map_err(|err| output_err(&format!("not writable: {err}")))?;

        self.run_config().validate()
    }
}

/// Immutable configuration consumed by the pipeline for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Records to skip before producing output (`None` skips nothing)
    pub skip: Option<u64>,
    /// Records to produce (`None` means all)
    pub games: Option<u64>,
    /// Records per output file, at least one
    pub chunk_size: usize,
    /// Produce no files
    pub dry_run: bool,
    /// Output file extension, without the leading dot
    pub extension: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            skip: None,
            games: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            dry_run: false,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl RunConfig {
    /// Set the number of records to skip
    #[must_use]
    pub fn with_skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Set the number of records to produce
    #[must_use]
    pub fn with_games(mut self, games: u64) -> Self {
        self.games = Some(games);
        self
    }

    /// Set the number of records per output file
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Enable or disable dry-run mode
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the output file extension
    #[must_use]
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.to_string();
        self
    }

    /// Check internal consistency.
    pub fn validate(&self) -> SplitResult<()> {
        if self.chunk_size == 0 {
            return Err(SplitError::InvalidConfig(
                "chunk size must be at least 1".to_string(),
            ));
        }
        if self.extension.is_empty() {
            return Err(SplitError::InvalidConfig(
                "extension must not be empty".to_string(),
            ));
        }
        if self.extension.contains(['/', '\\']) {
            return Err(SplitError::InvalidConfig(format!(
                "extension must not contain a path separator: {}",
                self.extension
            )));
        }
        Ok(())
    }
}
