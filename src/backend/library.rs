use super::Backend;
use crate::error::Error;

/// Derivation through `x25519-dalek`.
///
/// Only constructible when the crate is built with the `dalek` feature;
/// otherwise [`Library::new`] reports [`Error::LibraryUnavailable`].
#[derive(Clone, Copy, Debug)]
pub struct Library {
    _private: (),
}

impl Library {
    pub fn new() -> Result<Self, Error> {
        if Self::available() {
            Ok(Library { _private: () })
        } else {
            Err(Error::LibraryUnavailable)
        }
    }

    /// Whether the library was compiled in.
    pub const fn available() -> bool {
        cfg!(feature = "dalek")
    }
}

impl Backend for Library {
    fn name(&self) -> &'static str {
        "library"
    }

    #[cfg(feature = "dalek")]
    fn derive(&self, scalar: &[u8; 32]) -> [u8; 32] {
        x25519_dalek::x25519(*scalar, x25519_dalek::X25519_BASEPOINT_BYTES)
    }

    #[cfg(not(feature = "dalek"))]
    fn derive(&self, _scalar: &[u8; 32]) -> [u8; 32] {
        unreachable!("Library cannot be constructed without the `dalek` feature")
    }
}
