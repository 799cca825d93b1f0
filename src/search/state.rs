use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Counters and the stop flag shared by workers, the reporter and the
/// signal handler.
///
/// All accesses are relaxed: the counters are statistics and the stop flag
/// only needs to be observed eventually.
#[derive(Debug)]
pub struct SearchState {
    total: AtomicU64,
    found: AtomicU64,
    stop: AtomicBool,
    target: u64,
}

impl SearchState {
    /// A fresh state that stops after `target` matches.
    pub fn new(target: u64) -> Self {
        SearchState {
            total: AtomicU64::new(0),
            found: AtomicU64::new(0),
            stop: AtomicBool::new(false),
            target,
        }
    }

    /// Keys derived so far.
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Matches reported so far. Never exceeds the target.
    pub fn found(&self) -> u64 {
        self.found.load(Ordering::Relaxed).min(self.target)
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn add_keys(&self, count: u64) {
        if count > 0 {
            self.total.fetch_add(count, Ordering::Relaxed);
        }
    }

    /// Claims a slot for a new match.
    ///
    /// Returns `false` when the target was already reached by other workers,
    /// in which case the match must not be reported. Claiming the last slot
    /// requests a stop.
    pub fn claim_match(&self) -> bool {
        let claimed = self.found.fetch_add(1, Ordering::Relaxed) + 1;

        if claimed >= self.target {
            self.request_stop();
        }

        claimed <= self.target
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}
