use log::{debug, info};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::diagnose::{Reference, diagnose};
use super::divergence::{Divergence, Mismatch};
use super::{reference, vectors};
use crate::backend::{Backend, Baseline, Library, Packed};
use crate::field::{A24, FieldElement, LANES};
use crate::keys::x25519::{clamp, scalar_mult_basepoint};

/// Scalars per batch in the packed comparison; deliberately not a multiple
/// of [`LANES`].
const ACCELERATOR_BATCH: usize = 8 * LANES + 3;

/// Number of batches in the packed comparison.
const ACCELERATOR_BATCHES: usize = 4;

/// Random byte strings added to the fixed round-trip cases.
const ROUND_TRIP_SAMPLES: usize = 256;

/// Parameters of a self-test run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Seed of every random sample; equal seeds replay equal runs.
    pub seed: u64,
    /// Random operand pairs for the arithmetic checks.
    pub trials: usize,
    /// Random scalars for the ladder checks.
    pub ladder_trials: usize,
    /// Thread count for the packed backend comparison, if requested.
    pub accelerator: Option<usize>,
    /// Also compare against the library backend when it is compiled in.
    pub library: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            seed: 0,
            trials: 512,
            ladder_trials: 64,
            accelerator: None,
            library: true,
        }
    }
}

/// Number of comparisons performed per phase of a successful run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HarnessSummary {
    pub round_trips: usize,
    pub arithmetic: usize,
    pub ladder: usize,
    pub library: usize,
    pub accelerator: usize,
}

/// Runs every phase in order and stops at the first divergence.
pub fn run(config: &HarnessConfig) -> Result<HarnessSummary, Divergence> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut summary = HarnessSummary::default();

    summary.round_trips = check_round_trips(&mut rng)?;
    info!("encoding: {} round-trips ok", summary.round_trips);

    summary.arithmetic = check_arithmetic(&mut rng, config.trials)?;
    info!("arithmetic: {} comparisons ok", summary.arithmetic);

    let library = if config.library {
        match Library::new() {
            Ok(library) => Some(library),
            Err(err) => {
                info!("{err}; skipping library comparison");
                None
            }
        }
    } else {
        None
    };

    (summary.ladder, summary.library) =
        check_ladder(&mut rng, config.ladder_trials, library.as_ref())?;
    info!(
        "ladder: {} reference and {} library comparisons ok",
        summary.ladder, summary.library
    );

    if let Some(threads) = config.accelerator {
        summary.accelerator = check_accelerator(&mut rng, threads)?;
        info!("packed: {} keys match the baseline", summary.accelerator);
    }

    Ok(summary)
}

fn random_bytes(rng: &mut StdRng) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    rng.fill_bytes(&mut bytes);
    bytes
}

fn encode_mismatch(input: [u8; 32], expected: [u8; 32], element: &FieldElement) -> Divergence {
    Divergence::EncodeRoundTrip(Box::new(Mismatch {
        operation: "to_bytes(from_bytes)",
        inputs: vec![input],
        expected,
        actual: element.to_bytes(),
        limbs: Some(element.limbs()),
        trace: None,
    }))
}

/// Decodes and re-encodes fixed and random byte strings.
///
/// Covers 0, 1, `p − 1`, every power of two below 2²⁵⁵, every value in
/// `[p, 2²⁵⁵)`, inputs with bit 255 set, and random samples.
fn check_round_trips(rng: &mut StdRng) -> Result<usize, Divergence> {
    let p = reference::modulus();
    let mut cases = vec![
        reference::to_bytes(&BigUint::zero()),
        reference::to_bytes(&BigUint::one()),
        reference::to_bytes(&(p - BigUint::one())),
    ];

    for k in 0..255u32 {
        cases.push(reference::to_bytes(&(BigUint::one() << k)));
    }

    // p + i for i in 0..19 covers [p, 2^255); encoded without reduction.
    for i in 0..19u8 {
        let mut bytes = [0u8; 32];
        for (byte, digit) in bytes.iter_mut().zip((p + BigUint::from(i)).to_bytes_le()) {
            *byte = digit;
        }
        cases.push(bytes);
    }

    for _ in 0..ROUND_TRIP_SAMPLES {
        cases.push(random_bytes(rng));
    }

    let mut high = random_bytes(rng);
    high[31] |= 0x80;
    cases.push(high);
    cases.push([0xff; 32]);

    for input in &cases {
        let element = FieldElement::from_bytes(input);
        let expected = reference::canonical(input);

        if element.to_bytes() != expected {
            return Err(encode_mismatch(*input, expected, &element));
        }
    }

    debug!("checked {} encodings", cases.len());
    Ok(cases.len())
}

/// Compares one field operation against the reference value.
fn expect_field(
    operation: &'static str,
    inputs: &[&[u8; 32]],
    expected: &BigUint,
    actual: FieldElement,
    dump_limbs: bool,
) -> Result<(), Divergence> {
    let expected = reference::to_bytes(expected);
    let actual_bytes = actual.to_bytes();

    if expected == actual_bytes {
        return Ok(());
    }

    Err(Divergence::Arithmetic(Box::new(Mismatch {
        operation,
        inputs: inputs.iter().map(|input| reference::canonical(input)).collect(),
        expected,
        actual: actual_bytes,
        limbs: dump_limbs.then(|| actual.limbs()),
        trace: None,
    })))
}

/// Every field operation on `trials` random pairs.
fn check_arithmetic(rng: &mut StdRng, trials: usize) -> Result<usize, Divergence> {
    let mut checks = 0;

    for _ in 0..trials {
        let (a, b) = (random_bytes(rng), random_bytes(rng));
        let (fa, fb) = (FieldElement::from_bytes(&a), FieldElement::from_bytes(&b));
        let (ra, rb) = (reference::from_bytes(&a), reference::from_bytes(&b));

        expect_field("add", &[&a, &b], &reference::add(&ra, &rb), fa + fb, false)?;
        expect_field("sub", &[&a, &b], &reference::sub(&ra, &rb), fa - fb, false)?;
        expect_field("mul", &[&a, &b], &reference::mul(&ra, &rb), fa * fb, true)?;
        expect_field("square", &[&a], &reference::square(&ra), fa.square(), true)?;
        expect_field(
            "mul_small",
            &[&a],
            &reference::mul_small(&ra, A24 as u32),
            fa.mul_small(A24),
            true,
        )?;
        expect_field(
            "(a + b) * b",
            &[&a, &b],
            &reference::mul(&reference::add(&ra, &rb), &rb),
            (fa + fb) * fb,
            true,
        )?;
        expect_field(
            "(a - b) * (a + b)",
            &[&a, &b],
            &reference::mul(&reference::sub(&ra, &rb), &reference::add(&ra, &rb)),
            (fa - fb) * (fa + fb),
            true,
        )?;

        let inverse = fa.invert();
        expect_field("invert", &[&a], &reference::invert(&ra), inverse, false)?;

        let law = if fa.is_zero() {
            BigUint::zero()
        } else {
            BigUint::one()
        };
        expect_field("a * invert(a)", &[&a], &law, fa * inverse, true)?;

        checks += 9;
    }

    Ok(checks)
}

fn ladder_mismatch(scalar: [u8; 32], expected: [u8; 32], actual: [u8; 32]) -> Divergence {
    Divergence::Ladder(Box::new(Mismatch {
        operation: "scalar_mult_basepoint",
        inputs: vec![scalar],
        expected,
        actual,
        limbs: None,
        trace: diagnose(&scalar, &Reference, &Baseline::new()),
    }))
}

/// Known answers, the all-zero raw scalar and random scalars.
///
/// Returns the number of reference and library comparisons.
fn check_ladder(
    rng: &mut StdRng,
    trials: usize,
    library: Option<&Library>,
) -> Result<(usize, usize), Divergence> {
    let mut scalars = Vec::with_capacity(trials + 1);

    for (secret, public) in vectors::KNOWN_ANSWERS {
        let scalar = clamp(secret);
        let actual = scalar_mult_basepoint(&scalar);

        if actual != public {
            return Err(ladder_mismatch(scalar, public, actual));
        }
        scalars.push(scalar);
    }

    scalars.push(clamp([0u8; 32]));
    for _ in 0..trials {
        let raw = random_bytes(rng);
        let (scalar, expected) = (clamp(raw), reference::clamp(&raw));

        if scalar != expected {
            return Err(Divergence::Ladder(Box::new(Mismatch {
                operation: "clamp",
                inputs: vec![raw],
                expected,
                actual: scalar,
                limbs: None,
                trace: None,
            })));
        }
        scalars.push(scalar);
    }

    let (mut against_reference, mut against_library) = (vectors::KNOWN_ANSWERS.len(), 0);

    for scalar in &scalars {
        let actual = scalar_mult_basepoint(scalar);
        let expected = reference::scalar_mult_basepoint(scalar);

        if actual != expected {
            return Err(ladder_mismatch(*scalar, expected, actual));
        }
        against_reference += 1;

        if let Some(library) = library {
            let expected = library.derive(scalar);

            if actual != expected {
                return Err(Divergence::Ladder(Box::new(Mismatch {
                    operation: "scalar_mult_basepoint vs library",
                    inputs: vec![*scalar],
                    expected,
                    actual,
                    limbs: None,
                    trace: None,
                })));
            }
            against_library += 1;
        }
    }

    Ok((against_reference, against_library))
}

/// Packed batches against the baseline ladder.
fn check_accelerator(rng: &mut StdRng, threads: usize) -> Result<usize, Divergence> {
    let packed =
        Packed::new(threads).map_err(|err| Divergence::AcceleratorUnavailable(err.to_string()))?;
    let baseline = Baseline::new();
    let mut checks = 0;

    for _ in 0..ACCELERATOR_BATCHES {
        let scalars: Vec<[u8; 32]> = (0..ACCELERATOR_BATCH)
            .map(|_| clamp(random_bytes(rng)))
            .collect();
        let mut publics = vec![[0u8; 32]; scalars.len()];
        packed.derive_batch(&scalars, &mut publics);

        for (scalar, actual) in scalars.iter().zip(&publics) {
            let expected = baseline.derive(scalar);

            if *actual != expected {
                return Err(Divergence::Ladder(Box::new(Mismatch {
                    operation: "packed derive_batch",
                    inputs: vec![*scalar],
                    expected,
                    actual: *actual,
                    limbs: None,
                    trace: diagnose(scalar, &baseline, &packed),
                })));
            }
            checks += 1;
        }
    }

    Ok(checks)
}
