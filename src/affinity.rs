//! Pinning worker threads to CPU cores.
//!
//! Thread `index` goes to core `index % cores`, so a pool larger than the
//! machine wraps around. Pinning is best effort: a platform that cannot
//! list or set affinities leaves the thread where the scheduler put it.

use std::sync::OnceLock;

use core_affinity::CoreId;
use log::{debug, warn};

/// Cores the process may run on, listed once.
pub fn cores() -> &'static [CoreId] {
    static CORES: OnceLock<Vec<CoreId>> = OnceLock::new();

    CORES.get_or_init(|| {
        let cores = core_affinity::get_core_ids().unwrap_or_default();
        if cores.is_empty() {
            warn!("cannot list CPU cores; threads will not be pinned");
        }
        cores
    })
}

/// Pins the calling thread to core `index % cores().len()`.
///
/// Returns whether the thread is now pinned.
pub fn pin_current(index: usize) -> bool {
    let cores = cores();
    if cores.is_empty() {
        return false;
    }

    let core = cores[index % cores.len()];
    let pinned = core_affinity::set_for_current(core);

    if pinned {
        debug!("thread {index} pinned to core {}", core.id);
    } else {
        warn!("could not pin thread {index} to core {}", core.id);
    }

    pinned
}
