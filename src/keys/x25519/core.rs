use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use zeroize::Zeroize;

use super::ladder::scalar_mult_basepoint;
use crate::error::Error;
use crate::rng::KeySource;

/// Length of the base64 encoding of a 32-byte key, including the `=` pad.
pub const ENCODED_LEN: usize = 44;

/// Clamps a raw 32-byte scalar into the X25519 form of RFC 7748 §5.
///
/// The three low bits are cleared (multiple of the cofactor 8), bit 255 is
/// cleared and bit 254 is set. Clamping a clamped scalar is a no-op.
#[inline]
pub fn clamp(mut raw: [u8; 32]) -> [u8; 32] {
    raw[0] &= 248;
    raw[31] &= 127;
    raw[31] |= 64;
    raw
}

/// Encodes a key with the standard base64 alphabet into `out`.
///
/// Returns the number of characters written, always [`ENCODED_LEN`]. The
/// buffer is exactly sized for a 32-byte input so encoding cannot fail.
#[inline]
pub fn encode_key(key: &[u8; 32], out: &mut [u8; ENCODED_LEN]) -> usize {
    let written = match STANDARD.encode_slice(key, out) {
        Ok(written) => written,
        Err(err) => unreachable!("{ENCODED_LEN} bytes hold any encoded key: {err}"),
    };
    debug_assert_eq!(written, ENCODED_LEN);

    written
}

/// An X25519 secret key: a clamped 32-byte scalar.
///
/// The bytes are wiped when the key is dropped.
#[derive(Clone)]
pub struct SecretKey([u8; 32]);

impl SecretKey {
    /// Clamps `raw` and wraps it.
    pub fn from_raw(raw: [u8; 32]) -> Self {
        SecretKey(clamp(raw))
    }

    /// Draws a fresh clamped scalar from `source`.
    pub fn random(source: &mut KeySource) -> Self {
        let mut raw = [0u8; 32];
        source.fill(&mut raw);

        let key = Self::from_raw(raw);
        raw.zeroize();
        key
    }

    /// The clamped scalar bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derives the public key with the baseline ladder.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(scalar_mult_basepoint(&self.0))
    }

    /// Standard base64 encoding of the clamped scalar.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }
}

impl TryFrom<&[u8]> for SecretKey {
    type Error = Error;

    /// Accepts exactly 32 bytes and clamps them.
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let raw: [u8; 32] = bytes
            .try_into()
            .map_err(|_| Error::InvalidScalarLength(bytes.len()))?;

        Ok(Self::from_raw(raw))
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// An X25519 public key: the canonical u-coordinate of `secret · 9`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    /// Wraps an already canonical u-coordinate.
    #[inline]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        PublicKey(bytes)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Standard base64 encoding: [`ENCODED_LEN`] characters ending in `=`.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }
}
