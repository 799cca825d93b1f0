use std::fmt;

use super::reference;
use crate::backend::{Baseline, Packed};
use crate::keys::x25519::{LadderTrace, ladder_trace};

/// A ladder implementation that can record its intermediate states.
pub trait Traceable {
    fn name(&self) -> &'static str;
    fn trace(&self, scalar: &[u8; 32]) -> LadderTrace;
}

impl Traceable for Baseline {
    fn name(&self) -> &'static str {
        "baseline"
    }

    fn trace(&self, scalar: &[u8; 32]) -> LadderTrace {
        ladder_trace(scalar)
    }
}

impl Traceable for Packed {
    fn name(&self) -> &'static str {
        "packed"
    }

    fn trace(&self, scalar: &[u8; 32]) -> LadderTrace {
        Packed::trace(self, scalar)
    }
}

/// The big-integer ladder of [`reference`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Reference;

impl Traceable for Reference {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn trace(&self, scalar: &[u8; 32]) -> LadderTrace {
        reference::ladder_trace(scalar)
    }
}

/// Ladder state coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coordinate {
    X2,
    Z2,
    X3,
    Z3,
}

impl Coordinate {
    const ALL: [Coordinate; 4] = [Self::X2, Self::Z2, Self::X3, Self::Z3];
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X2 => "x2",
            Self::Z2 => "z2",
            Self::X3 => "x3",
            Self::Z3 => "z3",
        })
    }
}

/// Where two ladder traces first disagree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DivergencePoint {
    /// The traces have different numbers of steps.
    Length { left: usize, right: usize },
    /// State after processing scalar bit `bit` (ladder step `step`).
    Step {
        step: usize,
        bit: usize,
        coordinate: Coordinate,
        left: [u8; 32],
        right: [u8; 32],
    },
    /// Every step agrees but the final swap bit does not.
    FinalSwap { left: u32, right: u32 },
    /// Every step agrees but the affine outputs do not.
    Output { left: [u8; 32], right: [u8; 32] },
}

/// First divergence between two named ladder implementations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DivergenceReport {
    pub left: &'static str,
    pub right: &'static str,
    pub point: DivergencePoint,
}

impl fmt::Display for DivergenceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (left, right) = (self.left, self.right);

        match &self.point {
            DivergencePoint::Length { left: l, right: r } => {
                write!(f, "{left} recorded {l} steps, {right} recorded {r}")
            }
            DivergencePoint::Step {
                step,
                bit,
                coordinate,
                left: l,
                right: r,
            } => write!(
                f,
                "first divergence at step {step} (scalar bit {bit}), {coordinate}: \
                 {left}={} {right}={}",
                hex::encode(l),
                hex::encode(r),
            ),
            DivergencePoint::FinalSwap { left: l, right: r } => {
                write!(f, "final swap differs: {left}={l} {right}={r}")
            }
            DivergencePoint::Output { left: l, right: r } => write!(
                f,
                "states agree but outputs differ: {left}={} {right}={}",
                hex::encode(l),
                hex::encode(r),
            ),
        }
    }
}

/// Compares two recorded traces. Returns `None` if they are identical.
pub fn compare(left: &LadderTrace, right: &LadderTrace) -> Option<DivergencePoint> {
    for (step, (l, r)) in left.steps.iter().zip(&right.steps).enumerate() {
        let differs = Coordinate::ALL
            .into_iter()
            .zip(l.iter().zip(r))
            .find(|(_, (l, r))| l != r);

        if let Some((coordinate, (l, r))) = differs {
            return Some(DivergencePoint::Step {
                step,
                bit: LadderTrace::bit_at(step),
                coordinate,
                left: *l,
                right: *r,
            });
        }
    }

    if left.steps.len() != right.steps.len() {
        return Some(DivergencePoint::Length {
            left: left.steps.len(),
            right: right.steps.len(),
        });
    }

    if left.final_swap != right.final_swap {
        return Some(DivergencePoint::FinalSwap {
            left: left.final_swap,
            right: right.final_swap,
        });
    }

    if left.output != right.output {
        return Some(DivergencePoint::Output {
            left: left.output,
            right: right.output,
        });
    }

    None
}

/// Traces `scalar` through both implementations and reports the first
/// divergence, if any.
pub fn diagnose(
    scalar: &[u8; 32],
    left: &dyn Traceable,
    right: &dyn Traceable,
) -> Option<DivergenceReport> {
    compare(&left.trace(scalar), &right.trace(scalar)).map(|point| DivergenceReport {
        left: left.name(),
        right: right.name(),
        point,
    })
}
