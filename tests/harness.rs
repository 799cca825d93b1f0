use meshkey::backend::{Baseline, Packed};
use meshkey::keys::x25519::{LadderTrace, clamp, ladder_trace};
use meshkey::verify::{
    self, Coordinate, Divergence, DivergencePoint, HarnessConfig, Mismatch, Reference, Traceable,
    compare, diagnose, vectors,
};

/// The baseline ladder with one coordinate corrupted from a given step on.
struct Corrupted {
    from_step: usize,
}

impl Traceable for Corrupted {
    fn name(&self) -> &'static str {
        "corrupted"
    }

    fn trace(&self, scalar: &[u8; 32]) -> LadderTrace {
        let mut trace = ladder_trace(scalar);
        for step in &mut trace.steps[self.from_step..] {
            step[3][0] ^= 1;
        }
        trace
    }
}

fn small_config() -> HarnessConfig {
    HarnessConfig {
        seed: 3,
        trials: 32,
        ladder_trials: 4,
        accelerator: None,
        library: true,
    }
}

#[test]
fn harness_passes() {
    let summary = verify::run(&small_config()).unwrap();

    assert!(summary.round_trips >= 3 + 255 + 19);
    assert_eq!(summary.arithmetic, 32 * 9);
    // Known answers, then the all-zero scalar and the random ones.
    assert_eq!(summary.ladder, vectors::KNOWN_ANSWERS.len() * 2 + 1 + 4);
    assert_eq!(summary.accelerator, 0);
}

#[test]
fn harness_checks_accelerator_on_request() {
    let config = HarnessConfig {
        accelerator: Some(2),
        ..small_config()
    };

    let summary = verify::run(&config).unwrap();
    assert!(summary.accelerator > 0);
}

#[test]
fn harness_reports_unavailable_accelerator() {
    let config = HarnessConfig {
        accelerator: Some(0),
        ..small_config()
    };

    let divergence = verify::run(&config).unwrap_err();
    assert!(matches!(divergence, Divergence::AcceleratorUnavailable(_)));
    assert_eq!(divergence.exit_code(), 5);
}

#[test]
fn default_config_matches_documented_trials() {
    let config = HarnessConfig::default();
    assert_eq!(config.trials, 512);
    assert_eq!(config.ladder_trials, 64);
}

#[test]
fn identical_ladders_do_not_diverge() {
    let scalar = clamp(vectors::ALICE_SECRET);

    assert_eq!(diagnose(&scalar, &Baseline::new(), &Reference), None);
    assert_eq!(diagnose(&scalar, &Baseline::new(), &Packed::new(1).unwrap()), None);
}

#[test]
fn first_divergent_step_is_reported() {
    let scalar = clamp(vectors::BOB_SECRET);
    let report = diagnose(&scalar, &Reference, &Corrupted { from_step: 100 }).unwrap();

    assert_eq!(report.left, "reference");
    assert_eq!(report.right, "corrupted");
    match report.point {
        DivergencePoint::Step {
            step,
            bit,
            coordinate,
            ..
        } => {
            assert_eq!(step, 100);
            assert_eq!(bit, 154);
            assert_eq!(coordinate, Coordinate::Z3);
        }
        other => panic!("unexpected divergence {other:?}"),
    }
}

#[test]
fn output_only_divergence_is_reported() {
    let scalar = clamp(vectors::ALICE_SECRET);
    let left = ladder_trace(&scalar);
    let mut right = left.clone();
    right.output[5] ^= 0x40;

    assert!(matches!(
        compare(&left, &right),
        Some(DivergencePoint::Output { .. })
    ));

    let mut swapped = left.clone();
    swapped.final_swap ^= 1;
    assert!(matches!(
        compare(&left, &swapped),
        Some(DivergencePoint::FinalSwap { left: 0, right: 1 })
    ));
}

#[test]
fn truncated_trace_is_reported() {
    let scalar = clamp(vectors::ALICE_SECRET);
    let left = ladder_trace(&scalar);
    let mut right = left.clone();
    right.steps.truncate(10);

    assert_eq!(
        compare(&left, &right),
        Some(DivergencePoint::Length {
            left: 255,
            right: 10
        })
    );
}

#[test]
fn divergence_classes_have_distinct_exit_codes() {
    let mismatch = || {
        Box::new(Mismatch {
            operation: "mul",
            inputs: vec![[1u8; 32], [2u8; 32]],
            expected: [3u8; 32],
            actual: [4u8; 32],
            limbs: Some([0; 10]),
            trace: None,
        })
    };

    let codes = [
        Divergence::EncodeRoundTrip(mismatch()).exit_code(),
        Divergence::Arithmetic(mismatch()).exit_code(),
        Divergence::Ladder(mismatch()).exit_code(),
        Divergence::AcceleratorUnavailable("no pool".into()).exit_code(),
    ];

    assert_eq!(codes, [2, 3, 4, 5]);
}

#[test]
fn mismatch_report_names_operation_and_operands() {
    let divergence = Divergence::Arithmetic(Box::new(Mismatch {
        operation: "mul",
        inputs: vec![[0xab; 32]],
        expected: [0; 32],
        actual: [1; 32],
        limbs: Some([7; 10]),
        trace: None,
    }));

    let message = divergence.to_string();
    assert!(message.contains("mul("));
    assert!(message.contains(&"ab".repeat(32)));
    assert!(message.contains("limbs [7, 7, 7, 7, 7, 7, 7, 7, 7, 7]"));
    assert!(divergence.mismatch().is_some());
}
