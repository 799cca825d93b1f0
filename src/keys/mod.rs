//! Key material.
//!
//! The crate deals with a single kind of key: X25519 keypairs whose public
//! half is the Curve25519 u-coordinate of `secret · basepoint`.
//!
//! ## X25519
//!
//! The `x25519` module defines the clamped secret scalar and the public key
//! types, and implements basepoint scalar multiplication with the Montgomery
//! ladder of RFC 7748 on top of [`crate::field`]. No key agreement is
//! provided: the ladder always starts from the basepoint `u = 9`.
pub mod x25519;
