//! Vanity X25519 key search.
//!
//! This crate finds X25519 keypairs whose base64-encoded public key starts
//! or ends with a chosen string. It does so by brute force: random clamped
//! scalars are pushed through a Curve25519 Montgomery ladder until enough
//! encodings match.
//!
//! The ladder and the field arithmetic underneath it are implemented from
//! scratch, and everything that matters for correctness is checked against
//! an independent big-integer implementation before it is trusted.
//!
//! # Module overview
//!
//! - `field`
//!   Arithmetic in 𝔽ₚ with `p = 2²⁵⁵ − 19`, on ten signed limbs in radix
//!   `2^25.5`: decoding, canonical encoding, lazy addition and subtraction,
//!   multiplication with the ×19 fold, squaring, inversion and a
//!   constant-time conditional swap. A lane-parallel variant processes
//!   several elements at once for the packed backend.
//!
//! - `keys`
//!   Secret and public key types, scalar clamping, base64 encoding, and the
//!   Montgomery ladder computing `scalar · basepoint`. A tracing variant of
//!   the ladder records every intermediate state for diagnostics.
//!
//! - `backend`
//!   Interchangeable ways of deriving public keys: the scalar ladder, the
//!   lane-parallel ladder on a rayon pool, and `x25519-dalek` as a trusted
//!   library path. All of them must produce identical bytes.
//!
//! - `verify`
//!   The self-test harness. It compares encoding round-trips, every field
//!   operation and the ladder with a `num-bigint` reference and with the
//!   RFC 7748 vectors, cross-checks the backends, and on failure names the
//!   first diverging ladder step and coordinate.
//!
//! - `search`
//!   Pattern validation and matching, the worker threads, the shared
//!   search state and progress reporting.
//!
//! - `rng`
//!   Per-worker scalar sources seeded from the operating system.
//!
//! - `affinity`
//!   Optional pinning of search threads to CPU cores.
//!
//! # Design goals
//!
//! - No heap allocation on the per-key path
//! - Branch-free handling of secret scalar bits in the baseline ladder
//! - Every fast path checked against a slow, obviously correct one
//!
//! The packed backend gives up constant-time execution for throughput and
//! is meant for searches only. Nothing here provides key agreement,
//! signatures or any other curve.

pub mod affinity;
pub mod backend;
pub mod error;
pub mod field;
pub mod keys;
pub mod rng;
pub mod search;
pub mod verify;

pub use error::Error;
