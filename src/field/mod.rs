//! Arithmetic in the prime field 𝔽ₚ, `p = 2²⁵⁵ − 19`.
//!
//! This module groups the two representations of Curve25519 field elements
//! used by the key search:
//!
//! - `core`
//!   The scalar [`FieldElement`]: 10 signed limbs with alternating 26/25-bit
//!   widths, canonical encoding and decoding, the ring operations, the
//!   branch-free conditional swap and inversion through Fermat's little
//!   theorem.
//!
//! - `packed`
//!   [`PackedFieldElement`]: [`LANES`] field elements stored
//!   structure-of-arrays so that every limb operation runs across all lanes
//!   at once. It exists for the data-parallel backend and must agree with
//!   `FieldElement` bit for bit on every lane.
//!
//! - `ct`
//!   Constant-time comparison of canonical encodings.
//!
//! Nothing here returns an error: every operation is total over its inputs.
//! Elements are compared through their canonical bytes, never limb by limb,
//! because additions and subtractions leave limbs unreduced.

mod core;
mod ct;
mod packed;

pub use self::core::{FieldElement, LIMB_OFFSETS, LIMB_WIDTHS};
pub use ct::ConstantTimeEq;
pub use packed::{LANES, PackedFieldElement};

/// Curve coefficient `a24 = (486662 − 2) / 4` used by the ladder's doubling step.
pub const A24: i32 = 121_665;

/// The u-coordinate of the Curve25519 basepoint.
pub const BASEPOINT_U: i32 = 9;
