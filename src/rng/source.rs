use std::thread;
use std::time::Duration;

use log::{debug, warn};
use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};

/// Number of scalars drawn between two reseeds of an OS-seeded source.
pub const RESEED_INTERVAL: u64 = 1 << 20;

/// Attempts made before a fill is given up and retried from a fresh seed.
const FILL_ATTEMPTS: usize = 8;

/// Pause between two failed attempts to reach the OS entropy source.
const RETRY_DELAY: Duration = Duration::from_millis(10);

/// Per-worker source of raw 32-byte scalars.
pub struct KeySource {
    rng: StdRng,
    drawn: u64,
    reseed: bool,
}

impl KeySource {
    /// Creates a source seeded from the operating system.
    ///
    /// Blocks until the OS provides a seed; failures are logged and retried.
    pub fn from_os() -> Self {
        Self {
            rng: os_seeded(),
            drawn: 0,
            reseed: true,
        }
    }

    /// Creates a reproducible source. It is never reseeded.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            drawn: 0,
            reseed: false,
        }
    }

    /// Number of scalars drawn since the last (re)seed.
    pub fn drawn(&self) -> u64 {
        self.drawn
    }

    /// Fills `out` with 32 fresh random bytes.
    pub fn fill(&mut self, out: &mut [u8; 32]) {
        if self.reseed && self.drawn >= RESEED_INTERVAL {
            debug!("reseeding key source after {} scalars", self.drawn);
            self.rng = os_seeded();
            self.drawn = 0;
        }

        loop {
            for _ in 0..FILL_ATTEMPTS {
                if self.rng.try_fill_bytes(out).is_ok() {
                    self.drawn += 1;
                    return;
                }
            }

            warn!("random fill failed {FILL_ATTEMPTS} times, reseeding");
            self.rng = os_seeded();
        }
    }
}

impl Default for KeySource {
    fn default() -> Self {
        Self::from_os()
    }
}

/// Seeds a `StdRng` from the OS, retrying until it succeeds.
fn os_seeded() -> StdRng {
    loop {
        match StdRng::from_rng(OsRng) {
            Ok(rng) => return rng,
            Err(err) => {
                warn!("OS entropy unavailable ({err}), retrying");
                thread::sleep(RETRY_DELAY);
            }
        }
    }
}
