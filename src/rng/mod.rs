//! Random number generation module
//!
//! Secret scalars are drawn from a userspace generator ([`rand::rngs::StdRng`])
//! seeded from the operating system ([`rand::rngs::OsRng`]). Going to the OS
//! for every key would dominate the cost of the search, so each worker owns
//! one [`KeySource`] and only returns to the OS to reseed it periodically.
//!
//! Randomness failures are never fatal: a failed fill or reseed is logged and
//! retried, and a worker keeps its current state while the OS recovers.
//!
//! Deterministic sources ([`KeySource::from_seed`]) exist for the self-test
//! harness and for tests; they never reseed.

mod source;

pub use source::{KeySource, RESEED_INTERVAL};
