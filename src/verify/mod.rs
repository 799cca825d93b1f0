//! Verification of the field arithmetic and the ladder.
//!
//! Nothing in [`crate::field`] or [`crate::keys::x25519`] is trusted on its
//! own. This module checks them against an independent big-integer
//! implementation and against published test vectors, and cross-checks the
//! backends against each other.
//!
//! ## Structure
//!
//! - `reference`
//!   Straightforward arithmetic modulo `2²⁵⁵ − 19` on arbitrary-precision
//!   integers (`num-bigint`), and the RFC 7748 ladder written on top of it.
//!   Slow, obviously correct, and sharing no code with the limb arithmetic.
//!
//! - `vectors`
//!   Known answers from RFC 7748.
//!
//! - `harness`
//!   The self-test run: encoding round-trips, field operations, the ladder
//!   and, on request, the packed backend. It stops at the first mismatch and
//!   reports it as a [`Divergence`] with a distinct exit code per class.
//!
//! - `diagnose`
//!   Step-by-step comparison of two ladder implementations, naming the first
//!   step and coordinate where they part ways. Diagnostic only; the search
//!   never traces.

mod diagnose;
mod divergence;
mod harness;
pub mod reference;
pub mod vectors;

pub use diagnose::{Coordinate, DivergencePoint, DivergenceReport, Reference, Traceable, compare, diagnose};
pub use divergence::{Divergence, Mismatch};
pub use harness::{HarnessConfig, HarnessSummary, run};
