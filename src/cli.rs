use clap::{Parser, Subcommand, ValueEnum};

use meshkey::backend::BackendKind;
use meshkey::search::SearchConfig;

#[derive(Parser)]
#[command(name = "meshkey", version)]
#[command(about = "Vanity X25519 key search", long_about = None)]
pub struct Cli {
    /// Turn off periodic progress reports
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Search for keys whose base64 public key starts or ends with a string
    Search {
        /// Base64 characters [A-Za-z0-9+/] to look for (repeatable)
        #[arg(short, long = "search", required = true)]
        search: Vec<String>,
        /// Worker threads (default: logical cores)
        #[arg(short, long)]
        threads: Option<usize>,
        /// Stop after this many matches
        #[arg(short, long, default_value_t = 1)]
        count: u64,
        /// Derivation backend: auto, baseline, packed or library
        #[arg(long, default_value_t = BackendKind::Auto)]
        backend: BackendKind,
        /// Scalars per batch for the packed backend
        #[arg(long, default_value_t = SearchConfig::DEFAULT_BATCH)]
        batch: usize,
        /// Seconds between progress reports
        #[arg(long, default_value_t = 1)]
        interval: u64,
        /// Pin each worker thread to a CPU core
        #[arg(long)]
        affinity: bool,
    },
    /// Check the field arithmetic and the ladder against the reference
    Selftest {
        /// Seed for the random samples
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Random operand pairs for the arithmetic checks
        #[arg(long, default_value_t = 512)]
        trials: usize,
        /// Random scalars for the ladder checks
        #[arg(long, default_value_t = 64)]
        ladder_trials: usize,
        /// Also compare the packed backend with the baseline
        #[arg(long)]
        accelerator: bool,
        /// Threads for the packed backend (default: logical cores)
        #[arg(short, long)]
        threads: Option<usize>,
        /// Skip the comparison with x25519-dalek
        #[arg(long)]
        no_library: bool,
    },
    /// Trace one ladder run step by step against another implementation
    Trace {
        /// Secret key, as 44 base64 characters or 64 hex digits
        #[arg(long)]
        secret: String,
        /// Implementation to compare the baseline ladder with
        #[arg(long, value_enum, default_value_t = Against::Reference)]
        against: Against,
        /// Threads for the packed backend (default: logical cores)
        #[arg(short, long)]
        threads: Option<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Against {
    Reference,
    Packed,
}
