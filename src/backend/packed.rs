use std::array;
use std::mem;

use log::debug;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::{Backend, Batch};
use crate::affinity;
use crate::error::Error;
use crate::field::{A24, BASEPOINT_U, LANES, PackedFieldElement};
use crate::keys::x25519::{LADDER_STEPS, LadderTrace, clamp, scalar_bit, scalar_mult_basepoint};
use crate::rng::KeySource;
use crate::verify::vectors;

/// Seed of the scalars checked against the baseline at construction.
const SELF_CHECK_SEED: u64 = 0x6d65_7368_6b65_7921;

/// Random scalars checked at construction, chosen so the batch ends with a
/// partial lane group.
const SELF_CHECK_RANDOM: usize = 2 * LANES + 2;

/// [`LANES`] ladder states side by side.
#[derive(Clone, Copy)]
struct LaneState {
    x2: PackedFieldElement,
    z2: PackedFieldElement,
    x3: PackedFieldElement,
    z3: PackedFieldElement,
}

impl LaneState {
    const START: Self = LaneState {
        x2: PackedFieldElement::ONE,
        z2: PackedFieldElement::ZERO,
        x3: PackedFieldElement::splat_small(BASEPOINT_U as i64),
        z3: PackedFieldElement::ONE,
    };

    #[inline(always)]
    fn swap(&mut self, condition: [u32; LANES]) {
        self.x2.swap(&mut self.x3, condition);
        self.z2.swap(&mut self.z3, condition);
    }

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
        self.z3 = (da - cb).square().mul_small(BASEPOINT_U as i64);
        self.x2 = aa * bb;
        self.z2 = e * (aa + e.mul_small(A24 as i64));
    }

    /// Canonical `[x2, z2, x3, z3]` of one lane.
    fn lane_bytes(&self, lane: usize) -> [[u8; 32]; 4] {
        [self.x2, self.z2, self.x3, self.z3].map(|coordinate| coordinate.to_bytes()[lane])
    }

    fn affine(&self) -> [[u8; 32]; LANES] {
        (self.x2 * self.z2.invert()).to_bytes()
    }
}

/// Runs one ladder per lane, with the same deferred swap as the scalar ladder.
#[inline(always)]
fn run_lanes<F: FnMut(&LaneState)>(
    scalars: &[[u8; 32]; LANES],
    mut observe: F,
) -> (LaneState, [u32; LANES]) {
    let mut state = LaneState::START;
    let mut swap = [0u32; LANES];

    for t in (0..LADDER_STEPS).rev() {
        let bits: [u32; LANES] = array::from_fn(|lane| scalar_bit(&scalars[lane], t));

        for (s, bit) in swap.iter_mut().zip(bits) {
            *s ^= bit;
        }
        state.swap(swap);
        swap = bits;

        state.step();
        observe(&state);
    }

    state.swap(swap);

    (state, swap)
}

/// Public keys of [`LANES`] clamped scalars.
pub(crate) fn ladder_lanes(scalars: &[[u8; 32]; LANES]) -> [[u8; 32]; LANES] {
    run_lanes(scalars, |_| {}).0.affine()
}

/// Derives one chunk of at most [`LANES`] keys. Missing lanes are zero.
fn derive_chunk(scalars: &[[u8; 32]], out: &mut [[u8; 32]]) {
    let mut lanes = [[0u8; 32]; LANES];
    lanes[..scalars.len()].copy_from_slice(scalars);

    let publics = ladder_lanes(&lanes);
    out.copy_from_slice(&publics[..out.len()]);
}

/// Lane-parallel backend running on its own rayon pool.
pub struct Packed {
    pool: ThreadPool,
}

impl Packed {
    /// Builds a pool of `threads` workers and runs the known-answer check.
    ///
    /// Any failure is reported as [`Error::AcceleratorUnavailable`].
    pub fn new(threads: usize) -> Result<Self, Error> {
        Self::build(threads, false)
    }

    /// Like [`Packed::new`], with pool thread `i` pinned to core `i % cores`.
    pub fn pinned(threads: usize) -> Result<Self, Error> {
        Self::build(threads, true)
    }

    fn build(threads: usize, pin: bool) -> Result<Self, Error> {
        if threads == 0 {
            return Err(Error::AcceleratorUnavailable(
                "thread count must be at least 1".into(),
            ));
        }

        let mut builder = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("meshkey-lanes-{index}"));
        if pin {
            builder = builder.start_handler(|index| {
                affinity::pin_current(index);
            });
        }

        let pool = builder
            .build()
            .map_err(|err| Error::AcceleratorUnavailable(err.to_string()))?;

        let packed = Packed { pool };
        packed.self_check()?;

        debug!(
            "packed backend ready: {} lanes on {} threads",
            LANES,
            packed.threads()
        );

        Ok(packed)
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Records the ladder of `scalar` as run in lane 0, every lane holding
    /// the same scalar.
    pub fn trace(&self, scalar: &[u8; 32]) -> LadderTrace {
        let mut steps = Vec::with_capacity(LADDER_STEPS);
        let (state, swap) = run_lanes(&[*scalar; LANES], |state| steps.push(state.lane_bytes(0)));

        LadderTrace {
            steps,
            final_swap: swap[0],
            output: state.affine()[0],
        }
    }

    /// Compares against the RFC 7748 vectors and the baseline ladder.
    fn self_check(&self) -> Result<(), Error> {
        let mut source = KeySource::from_seed(SELF_CHECK_SEED);

        let mut scalars = vec![
            clamp(vectors::ALICE_SECRET),
            clamp(vectors::BOB_SECRET),
            clamp(vectors::ITERATION_SCALAR),
        ];
        let mut expected = vec![
            vectors::ALICE_PUBLIC,
            vectors::BOB_PUBLIC,
            vectors::ITERATION_OUTPUT,
        ];

        for _ in 0..SELF_CHECK_RANDOM {
            let mut raw = [0u8; 32];
            source.fill(&mut raw);

            let scalar = clamp(raw);
            expected.push(scalar_mult_basepoint(&scalar));
            scalars.push(scalar);
        }

        let mut actual = vec![[0u8; 32]; scalars.len()];
        self.derive_batch(&scalars, &mut actual);

        match actual.iter().zip(&expected).position(|(a, e)| a != e) {
            None => Ok(()),
            Some(index) => Err(Error::AcceleratorUnavailable(format!(
                "self-check mismatch for scalar {}: expected {}, got {}",
                hex::encode(scalars[index]),
                hex::encode(expected[index]),
                hex::encode(actual[index]),
            ))),
        }
    }
}

impl Backend for Packed {
    fn name(&self) -> &'static str {
        "packed"
    }

    fn derive(&self, scalar: &[u8; 32]) -> [u8; 32] {
        let mut out = [[0u8; 32]; 1];
        derive_chunk(&[*scalar], &mut out);
        out[0]
    }

    fn derive_batch(&self, scalars: &Batch, out: &mut Batch) {
        debug_assert_eq!(scalars.len(), out.len());

        self.pool.install(|| {
            scalars
                .par_chunks(LANES)
                .zip(out.par_chunks_mut(LANES))
                .for_each(|(s, o)| derive_chunk(s, o));
        });
    }

    fn is_batched(&self) -> bool {
        true
    }

    /// Two batches in flight: while `consume` reads batch `n` on one side of
    /// a `rayon::join`, batch `n + 1` is derived on the other. The two sides
    /// own disjoint buffers, which are exchanged once both finish.
    fn pipeline(
        &self,
        batch_len: usize,
        fill: &mut (dyn FnMut(&mut Batch) -> bool + Send),
        consume: &mut (dyn FnMut(&Batch, &Batch) -> bool + Send),
    ) {
        let mut current = (vec![[0u8; 32]; batch_len], vec![[0u8; 32]; batch_len]);
        let mut next = (vec![[0u8; 32]; batch_len], vec![[0u8; 32]; batch_len]);

        if !fill(&mut current.0[..]) {
            return;
        }
        self.derive_batch(&current.0, &mut current.1);

        self.pool.install(|| {
            loop {
                if !fill(&mut next.0[..]) {
                    consume(&current.0[..], &current.1[..]);
                    return;
                }

                let (scalars, publics) = (&next.0, &mut next.1);
                let (_, keep_going) = rayon::join(
                    || {
                        scalars
                            .par_chunks(LANES)
                            .zip(publics.par_chunks_mut(LANES))
                            .for_each(|(s, o)| derive_chunk(s, o))
                    },
                    || consume(&current.0[..], &current.1[..]),
                );

                if !keep_going {
                    return;
                }

                mem::swap(&mut current, &mut next);
            }
        });
    }
}
