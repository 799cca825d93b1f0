use std::fmt;

use thiserror::Error;

use super::DivergenceReport;

/// One failed comparison against the reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    /// Operation under test, e.g. `mul` or `scalar_mult_basepoint`.
    pub operation: &'static str,
    /// Operands, as canonical encodings.
    pub inputs: Vec<[u8; 32]>,
    pub expected: [u8; 32],
    pub actual: [u8; 32],
    /// Raw limbs of the diverging result, when it came out of the limb code.
    pub limbs: Option<[i32; 10]>,
    /// Step-level comparison, for ladder divergences.
    pub trace: Option<DivergenceReport>,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.operation)?;
        for (index, input) in self.inputs.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&hex::encode(input))?;
        }
        write!(
            f,
            "): expected {}, got {}",
            hex::encode(self.expected),
            hex::encode(self.actual)
        )?;

        if let Some(limbs) = &self.limbs {
            write!(f, "; limbs {limbs:?}")?;
        }
        if let Some(trace) = &self.trace {
            write!(f, "; {trace}")?;
        }

        Ok(())
    }
}

/// Failure classes of the self-test harness.
#[derive(Debug, Error)]
pub enum Divergence {
    #[error("encoding round-trip failed: {0}")]
    EncodeRoundTrip(Box<Mismatch>),

    #[error("field arithmetic disagrees with the reference: {0}")]
    Arithmetic(Box<Mismatch>),

    #[error("ladder disagrees: {0}")]
    Ladder(Box<Mismatch>),

    #[error("accelerated backend unavailable: {0}")]
    AcceleratorUnavailable(String),
}

impl Divergence {
    /// Process exit status for this class. Each class has its own code.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::EncodeRoundTrip(_) => 2,
            Self::Arithmetic(_) => 3,
            Self::Ladder(_) => 4,
            Self::AcceleratorUnavailable(_) => 5,
        }
    }

    /// The failed comparison, if this class carries one.
    pub fn mismatch(&self) -> Option<&Mismatch> {
        match self {
            Self::EncodeRoundTrip(m) | Self::Arithmetic(m) | Self::Ladder(m) => Some(m),
            Self::AcceleratorUnavailable(_) => None,
        }
    }
}
