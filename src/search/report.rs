use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use log::info;

use super::SearchState;

const UNITS: [&str; 7] = ["", "K", "M", "G", "T", "P", "E"];

/// Granularity at which the reporter notices a stop request.
const POLL: Duration = Duration::from_millis(50);

/// Formats a count with decimal unit suffixes.
///
/// Two decimals below 10 units, one below 100, none above; counts under
/// 1000 are printed as-is.
pub fn human(n: u64) -> String {
    let mut value = n as f64;
    let mut unit = 0;

    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    let suffix = UNITS[unit];
    if n >= 1000 && value < 10.0 {
        format!("{value:.2}{suffix}")
    } else if n >= 1000 && value < 100.0 {
        format!("{value:.1}{suffix}")
    } else {
        format!("{value:.0}{suffix}")
    }
}

/// Totals of a finished search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub total: u64,
    pub found: u64,
    pub elapsed: Duration,
}

impl Summary {
    /// Keys per second over the whole run.
    pub fn rate(&self) -> u64 {
        (self.total as f64 / self.elapsed.as_secs_f64().max(1e-9)) as u64
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Done. Elapsed: {:.3}s | total keys: {} | found: {} | rate: {}/s",
            self.elapsed.as_secs_f64(),
            human(self.total),
            self.found,
            human(self.rate())
        )
    }
}

/// Logs the running total and the rate over the last interval until a stop
/// is requested.
pub(crate) fn reporter(state: &SearchState, interval: Duration) {
    let mut last = 0;

    loop {
        let tick = Instant::now();
        while tick.elapsed() < interval {
            if state.should_stop() {
                return;
            }
            thread::sleep(POLL.min(interval));
        }

        let total = state.total();
        let per_second = ((total - last) as f64 / tick.elapsed().as_secs_f64()) as u64;
        last = total;

        info!("Keys: total={}, {}/s", human(total), human(per_second));
    }
}
