//! Public key derivation strategies.
//!
//! Every backend computes the same function, `clamped scalar ↦ X25519 public
//! key`, and must agree byte for byte with the others. They differ only in
//! how the work is scheduled:
//!
//! - `baseline`
//!   The scalar 10-limb ladder of [`crate::keys::x25519`], one key at a time.
//!   Constant time with respect to the scalar.
//!
//! - `packed`
//!   The lane-parallel ladder over [`crate::field::PackedFieldElement`],
//!   with batches spread over a dedicated rayon pool. Construction runs a
//!   known-answer self-check and fails loudly if it does not pass. No
//!   constant-time guarantee.
//!
//! - `library`
//!   `x25519-dalek`, compiled in with the `dalek` feature. Used as a trusted
//!   cross-check by the self-test harness, and selectable for searches.
//!
//! Callers hold a `Box<dyn Backend>` obtained from [`select`], which resolves
//! every option at initialization: a backend that cannot be provided is an
//! error (or, for [`BackendKind::Auto`], a logged fallback), never a silent
//! no-op.

mod baseline;
mod library;
mod packed;

use std::fmt;
use std::str::FromStr;

use log::warn;

pub use baseline::{Baseline, Capability};
pub use library::Library;
pub use packed::Packed;

use crate::error::Error;

/// One batch of 32-byte values (scalars or public keys).
pub type Batch = [[u8; 32]];

/// A way of deriving X25519 public keys from clamped scalars.
pub trait Backend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Derives the public key of one clamped scalar.
    fn derive(&self, scalar: &[u8; 32]) -> [u8; 32];

    /// Derives `out[i]` from `scalars[i]` for every `i`.
    ///
    /// Both slices must have the same length.
    fn derive_batch(&self, scalars: &Batch, out: &mut Batch) {
        debug_assert_eq!(scalars.len(), out.len());

        for (scalar, public) in scalars.iter().zip(out.iter_mut()) {
            *public = self.derive(scalar);
        }
    }

    /// Whether searches should drive this backend through [`Backend::pipeline`]
    /// from a single thread instead of one scalar worker per thread.
    fn is_batched(&self) -> bool {
        false
    }

    /// Streams batches of `batch_len` scalars through the backend.
    ///
    /// `fill` writes the next batch of scalars and returns `false` when no more
    /// work is wanted. `consume` receives each batch of scalars with its public
    /// keys and returns `false` to stop. The default runs the three stages in
    /// turn; batched backends overlap them.
    fn pipeline(
        &self,
        batch_len: usize,
        fill: &mut (dyn FnMut(&mut Batch) -> bool + Send),
        consume: &mut (dyn FnMut(&Batch, &Batch) -> bool + Send),
    ) {
        let mut scalars = vec![[0u8; 32]; batch_len];
        let mut publics = vec![[0u8; 32]; batch_len];

        while fill(&mut scalars[..]) {
            self.derive_batch(&scalars, &mut publics);

            if !consume(&scalars[..], &publics[..]) {
                break;
            }
        }
    }
}

/// Backend requested by the operator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// Packed when it initializes, baseline otherwise.
    #[default]
    Auto,
    Baseline,
    Packed,
    Library,
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "baseline" => Ok(Self::Baseline),
            "packed" => Ok(Self::Packed),
            "library" | "dalek" => Ok(Self::Library),
            other => Err(Error::InvalidConfig(format!(
                "unknown backend {other:?} (expected auto, baseline, packed or library)"
            ))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Baseline => "baseline",
            Self::Packed => "packed",
            Self::Library => "library",
        })
    }
}

/// Builds the backend for `kind`.
///
/// `threads` sizes the packed backend's pool and is ignored by the others.
pub fn select(kind: BackendKind, threads: usize) -> Result<Box<dyn Backend>, Error> {
    select_with_affinity(kind, threads, false)
}

/// [`select`], pinning the packed pool's threads to cores when `affinity` is set.
pub fn select_with_affinity(
    kind: BackendKind,
    threads: usize,
    affinity: bool,
) -> Result<Box<dyn Backend>, Error> {
    let packed = |threads| {
        if affinity {
            Packed::pinned(threads)
        } else {
            Packed::new(threads)
        }
    };

    match kind {
        BackendKind::Baseline => Ok(Box::new(Baseline::new())),
        BackendKind::Packed => Ok(Box::new(packed(threads)?)),
        BackendKind::Library => Ok(Box::new(Library::new()?)),
        BackendKind::Auto => match packed(threads) {
            Ok(packed) => Ok(Box::new(packed)),
            Err(err) => {
                warn!("{err}; falling back to the baseline backend");
                Ok(Box::new(Baseline::new()))
            }
        },
    }
}
