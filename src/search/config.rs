use std::thread;
use std::time::Duration;

use super::Pattern;
use crate::backend::BackendKind;
use crate::error::Error;

/// Worker count used when the platform cannot report its parallelism.
const FALLBACK_THREADS: usize = 4;

/// Parameters of one search.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Worker threads, or the packed backend's pool size.
    pub threads: usize,
    /// Matches to find before stopping.
    pub count: u64,
    pub patterns: Vec<Pattern>,
    pub backend: BackendKind,
    /// Scalars per batch for batched backends.
    pub batch: usize,
    /// Suppresses the periodic progress report.
    pub quiet: bool,
    /// Time between two progress reports.
    pub interval: Duration,
    /// Pins worker `i` to core `i % cores`.
    pub affinity: bool,
}

impl SearchConfig {
    pub const DEFAULT_BATCH: usize = 1024;
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

    /// Defaults for everything but the patterns.
    pub fn new(patterns: Vec<Pattern>) -> Self {
        SearchConfig {
            threads: default_threads(),
            count: 1,
            patterns,
            backend: BackendKind::Auto,
            batch: Self::DEFAULT_BATCH,
            quiet: false,
            interval: Self::DEFAULT_INTERVAL,
            affinity: false,
        }
    }

    /// Rejects values the search cannot run with.
    pub fn validate(&self) -> Result<(), Error> {
        let invalid = |message: &str| Err(Error::InvalidConfig(message.to_owned()));

        if self.patterns.is_empty() {
            return invalid("at least one search string is required");
        }
        if self.threads == 0 {
            return invalid("threads must be > 0");
        }
        if self.count == 0 {
            return invalid("count must be > 0");
        }
        if self.batch == 0 {
            return invalid("batch size must be > 0");
        }
        if self.interval.is_zero() {
            return invalid("report interval must be > 0");
        }

        Ok(())
    }
}

/// Logical cores available to the process.
pub fn default_threads() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_THREADS)
}
