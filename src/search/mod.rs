//! Vanity key search.
//!
//! Workers draw random scalars, clamp them, derive the public key through a
//! [`crate::backend::Backend`], encode it in base64 and test it against every
//! [`Pattern`]. Matches go to a [`MatchSink`] as `FOUND: pub=… priv=…`
//! lines; their order across threads is unspecified.
//!
//! All shared state lives in one [`SearchState`] passed by reference: the
//! running total, the number of matches, the target and the stop flag. The
//! flag is raised when the target is reached, when the caller's signal
//! handler fires, or when the search ends for any other reason, and every
//! worker checks it once per key (once per batch for batched backends).
//!
//! Workers accumulate their key count locally and publish it every
//! [`COUNTER_FLUSH`] keys, so the total seen by the reporter lags slightly.

mod config;
mod pattern;
mod report;
mod state;
mod worker;

pub use config::{SearchConfig, default_threads};
pub use pattern::{FINAL_CHARS, MAX_PATTERN_LEN, Pattern, matches_any, parse_patterns};
pub use report::{Summary, human};
pub use state::SearchState;
pub use worker::{COUNTER_FLUSH, Match, MatchSink, StdoutSink, run};
