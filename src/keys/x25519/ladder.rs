//! Montgomery ladder over Curve25519 (RFC 7748 §5).
//!
//! The ladder keeps two projective points `(X2:Z2)` and `(X3:Z3)` whose
//! difference is always the basepoint. For each scalar bit, from bit 254 down
//! to bit 0, the pair is conditionally swapped and then replaced by
//! `(2·P2, P2 + P3)` with one differential addition and one doubling.
//! Swapping is deferred: the pair is only swapped when the current bit
//! differs from the previous one, and a final swap with the last bit
//! restores the order. Reordering the swap relative to the step yields a
//! different, wrong point.
//!
//! The loop length is fixed at 255 iterations and all state lives on the
//! stack; nothing here allocates except [`ladder_trace`].

use crate::field::{A24, BASEPOINT_U, FieldElement};

/// Number of scalar bits processed by the ladder (bits 254 to 0).
pub const LADDER_STEPS: usize = 255;

/// Running state of the ladder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LadderState {
    pub x2: FieldElement,
    pub z2: FieldElement,
    pub x3: FieldElement,
    pub z3: FieldElement,
}

impl LadderState {
    /// `(X2:Z2) = (1:0)`, the point at infinity, and `(X3:Z3) = (9:1)`.
    pub const START: Self = LadderState {
        x2: FieldElement::ONE,
        z2: FieldElement::ZERO,
        x3: FieldElement::from_small(BASEPOINT_U),
        z3: FieldElement::ONE,
    };

    /// Canonical encodings in `[x2, z2, x3, z3]` order.
    pub fn to_bytes(&self) -> [[u8; 32]; 4] {
        [
            self.x2.to_bytes(),
            self.z2.to_bytes(),
            self.x3.to_bytes(),
            self.z3.to_bytes(),
        ]
    }

    #[inline(always)]
    fn swap(&mut self, condition: u32) {
        self.x2.swap(&mut self.x3, condition);
        self.z2.swap(&mut self.z3, condition);
    }

    /// One differential addition and doubling.
    #[inline(always)]
    fn step(&mut self) {
        let a = self.x2 + self.z2;
        let aa = a.square();
        let b = self.x2 - self.z2;
        let bb = b.square();
        let e = aa - bb;
        let c = self.x3 + self.z3;
        let d = self.x3 - self.z3;
        let da = d * a;
        let cb = c * b;

        self.x3 = (da + cb).square();
        self.z3 = (da - cb).square().mul_small(BASEPOINT_U);
        self.x2 = aa * bb;
        self.z2 = e * (aa + e.mul_small(A24));
    }
}

/// Extracts bit `t` of a little-endian scalar.
#[inline(always)]
pub(crate) fn scalar_bit(scalar: &[u8; 32], t: usize) -> u32 {
    ((scalar[t >> 3] >> (t & 7)) & 1) as u32
}

/// Runs the ladder, handing the state to `observe` after every step.
///
/// Returns the state after the final swap together with that swap bit.
#[inline(always)]
fn run<F: FnMut(&LadderState)>(scalar: &[u8; 32], mut observe: F) -> (LadderState, u32) {
    let mut state = LadderState::START;
    let mut swap = 0u32;

    for t in (0..LADDER_STEPS).rev() {
        let bit = scalar_bit(scalar, t);
        swap ^= bit;
        state.swap(swap);
        swap = bit;

        state.step();
        observe(&state);
    }

    state.swap(swap);

    (state, swap)
}

/// Computes the X25519 public key for an already clamped scalar.
///
/// The scalar is read as-is, bit 255 excluded; callers clamp first (see
/// [`super::clamp`]). The result is `X2 / Z2` in canonical encoding.
/// For a clamped scalar `Z2` is never zero.
pub fn scalar_mult_basepoint(scalar: &[u8; 32]) -> [u8; 32] {
    let (state, _) = run(scalar, |_| {});

    (state.x2 * state.z2.invert()).to_bytes()
}

/// Every intermediate state of one ladder run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LadderTrace {
    /// `steps[i]` is the state right after processing bit `254 − i`,
    /// encoded as `[x2, z2, x3, z3]`.
    pub steps: Vec<[[u8; 32]; 4]>,
    /// Swap bit applied after the loop.
    pub final_swap: u32,
    /// Resulting public key.
    pub output: [u8; 32],
}

impl LadderTrace {
    /// The scalar bit processed at `step`.
    pub fn bit_at(step: usize) -> usize {
        LADDER_STEPS - 1 - step
    }
}

/// Runs the ladder like [`scalar_mult_basepoint`] while recording every step.
///
/// Diagnostic only: it allocates and encodes four field elements per bit.
pub fn ladder_trace(scalar: &[u8; 32]) -> LadderTrace {
    let mut steps = Vec::with_capacity(LADDER_STEPS);
    let (state, final_swap) = run(scalar, |state| steps.push(state.to_bytes()));

    LadderTrace {
        steps,
        final_swap,
        output: (state.x2 * state.z2.invert()).to_bytes(),
    }
}
