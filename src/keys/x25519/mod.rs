//! X25519 public key derivation.
//!
//! ## Structure
//!
//! - `core`
//!   Secret and public key types, clamping and base64 encoding.
//!
//! - `ladder`
//!   The Montgomery ladder computing `clamped_scalar · (u = 9)`, plus a
//!   tracing variant that records the ladder state after every step for
//!   divergence diagnostics.

mod core;
mod ladder;

pub use self::core::{ENCODED_LEN, PublicKey, SecretKey, clamp, encode_key};
pub use ladder::{LADDER_STEPS, LadderState, LadderTrace, ladder_trace, scalar_mult_basepoint};
pub(crate) use ladder::scalar_bit;
