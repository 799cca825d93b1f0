use std::sync::OnceLock;

use log::info;

use super::Backend;
use crate::keys::x25519::scalar_mult_basepoint;

/// CPU features relevant to field arithmetic, detected once per process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// Portable 64-bit integer arithmetic.
    Baseline,
    /// `adx` and `bmi2` are available. There is no dedicated path for them
    /// yet; they run the baseline ladder.
    AdxBmi2,
}

impl Capability {
    /// Probes the CPU on first call and caches the answer.
    pub fn detect() -> Self {
        static DETECTED: OnceLock<Capability> = OnceLock::new();

        *DETECTED.get_or_init(|| {
            #[cfg(target_arch = "x86_64")]
            {
                if std::arch::is_x86_feature_detected!("adx")
                    && std::arch::is_x86_feature_detected!("bmi2")
                {
                    return Capability::AdxBmi2;
                }
            }

            Capability::Baseline
        })
    }
}

/// The scalar 10-limb Montgomery ladder.
#[derive(Clone, Copy, Debug)]
pub struct Baseline {
    capability: Capability,
}

impl Baseline {
    pub fn new() -> Self {
        let capability = Capability::detect();

        if capability == Capability::AdxBmi2 {
            info!("adx/bmi2 detected, using the portable baseline ladder");
        }

        Baseline { capability }
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }
}

impl Default for Baseline {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for Baseline {
    fn name(&self) -> &'static str {
        "baseline"
    }

    #[inline]
    fn derive(&self, scalar: &[u8; 32]) -> [u8; 32] {
        scalar_mult_basepoint(scalar)
    }
}
