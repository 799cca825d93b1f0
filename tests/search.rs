use std::sync::Mutex;
use std::time::Duration;

use meshkey::Error;
use meshkey::affinity;
use meshkey::backend::{BackendKind, Baseline, Packed, select_with_affinity};
use meshkey::keys::x25519::scalar_mult_basepoint;
use meshkey::search::{
    self, FINAL_CHARS, Match, Pattern, SearchConfig, SearchState, human, matches_any,
    parse_patterns,
};

fn config(patterns: &[&str], threads: usize) -> SearchConfig {
    let mut config = SearchConfig::new(parse_patterns(patterns).unwrap());
    config.threads = threads;
    config.quiet = true;
    config
}

#[test]
fn pattern_validation() {
    assert!(Pattern::new("abc+/09").is_ok());
    assert!(Pattern::new(&"A".repeat(43)).is_ok());

    for bad in ["", "ab=", "a-b", "héllo", "A".repeat(44).as_str()] {
        assert!(
            matches!(Pattern::new(bad), Err(Error::InvalidPattern { .. })),
            "{bad:?} should be rejected"
        );
    }
}

#[test]
fn pattern_prefix_and_suffix() {
    let pattern = Pattern::new("Mesh").unwrap();
    assert_eq!(pattern.prefix(), "Mesh");
    assert_eq!(pattern.suffix(), "Mesh=");

    assert!(pattern.matches(b"MeshAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA="));
    assert!(pattern.matches(b"AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAMesh="));
    assert!(!pattern.matches(b"AAAAAAAAAAAAAAAAAAAMeshAAAAAAAAAAAAAAAAAAAA="));
    assert!(!pattern.matches(b"meshAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA="));
}

#[test]
fn any_pattern_matches() {
    let patterns = parse_patterns(&["abc", "XYZ"]).unwrap();

    assert!(matches_any(&patterns, b"XYZ-rest"));
    assert!(matches_any(&patterns, b"rest-abc="));
    assert!(!matches_any(&patterns, b"nothing here="));
}

#[test]
fn suffix_reachability() {
    for c in FINAL_CHARS.chars() {
        assert!(Pattern::new(&format!("x{c}")).unwrap().suffix_reachable());
    }
    assert!(!Pattern::new("xB").unwrap().suffix_reachable());
    assert!(!Pattern::new("Z").unwrap().suffix_reachable());
}

#[test]
fn empty_pattern_list_is_rejected() {
    let none: [&str; 0] = [];
    assert!(matches!(parse_patterns(&none), Err(Error::InvalidConfig(_))));
}

#[test]
fn human_units() {
    assert_eq!(human(0), "0");
    assert_eq!(human(999), "999");
    assert_eq!(human(1_500), "1.50K");
    assert_eq!(human(25_000), "25.0K");
    assert_eq!(human(250_000), "250K");
    assert_eq!(human(1_000_000), "1.00M");
    assert_eq!(human(7_200_000_000), "7.20G");
    assert_eq!(human(u64::MAX), "18.4E");
}

#[test]
fn config_validation() {
    let mut config = config(&["A"], 1);
    assert!(config.validate().is_ok());
    assert_eq!(config.backend, BackendKind::Auto);
    assert_eq!(config.batch, SearchConfig::DEFAULT_BATCH);
    assert!(!config.affinity);

    config.threads = 0;
    assert!(config.validate().is_err());
    config.threads = 1;

    config.count = 0;
    assert!(config.validate().is_err());
    config.count = 1;

    config.interval = Duration::ZERO;
    assert!(config.validate().is_err());
}

#[test]
fn state_claims_stop_at_target() {
    let state = SearchState::new(2);

    assert!(state.claim_match());
    assert!(!state.should_stop());
    assert!(state.claim_match());
    assert!(state.should_stop());
    assert!(!state.claim_match());
    assert_eq!(state.found(), 2);
}

fn check_matches(found: &[Match], prefix: &str) {
    for m in found {
        let public = m.public.to_base64();
        assert!(public.starts_with(prefix) || public.ends_with(&format!("{prefix}=")));
        assert_eq!(scalar_mult_basepoint(m.secret.as_bytes()), *m.public.as_bytes());
        assert!(m.to_string().starts_with("FOUND: pub="));
    }
}

#[test]
fn scalar_search_finds_requested_count() {
    let mut config = config(&["A"], 2);
    config.count = 2;

    let state = SearchState::new(config.count);
    let sink = Mutex::new(Vec::<Match>::new());
    let summary = search::run(&config, &state, &Baseline::new(), &sink).unwrap();

    let found = sink.into_inner().unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(summary.found, 2);
    assert!(summary.total >= 2);
    check_matches(&found, "A");
}

#[test]
fn batched_search_finds_match() {
    let mut config = config(&["B"], 2);
    config.batch = 64;

    let state = SearchState::new(1);
    let sink = Mutex::new(Vec::<Match>::new());
    let packed = Packed::new(2).unwrap();
    let summary = search::run(&config, &state, &packed, &sink).unwrap();

    let found = sink.into_inner().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(summary.total % 64, 0);
    check_matches(&found, "B");
}

#[test]
fn stop_request_ends_search() {
    // 43 characters: practically never matches.
    let long = "Q".repeat(43);
    let config = config(&[long.as_str()], 1);
    let state = SearchState::new(1);
    state.request_stop();

    let sink = Mutex::new(Vec::<Match>::new());
    let summary = search::run(&config, &state, &Baseline::new(), &sink).unwrap();

    assert_eq!(summary.found, 0);
    assert!(sink.into_inner().unwrap().is_empty());
}

#[test]
fn pinned_scalar_search_finds_matches() {
    let mut config = config(&["C"], 3);
    config.count = 2;
    config.affinity = true;

    let state = SearchState::new(config.count);
    let sink = Mutex::new(Vec::<Match>::new());
    let summary = search::run(&config, &state, &Baseline::new(), &sink).unwrap();

    let found = sink.into_inner().unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(summary.found, 2);
    check_matches(&found, "C");
}

#[test]
fn pinned_packed_search_finds_match() {
    let mut config = config(&["D"], 2);
    config.batch = 32;
    config.affinity = true;

    let backend = select_with_affinity(BackendKind::Packed, config.threads, true).unwrap();
    let state = SearchState::new(1);
    let sink = Mutex::new(Vec::<Match>::new());
    search::run(&config, &state, backend.as_ref(), &sink).unwrap();

    let found = sink.into_inner().unwrap();
    assert_eq!(found.len(), 1);
    check_matches(&found, "D");
}

#[test]
fn pinning_wraps_around_cores() {
    let cores = affinity::cores().len();

    // A spare thread, so the test thread keeps its own affinity.
    let pinned = std::thread::spawn(move || affinity::pin_current(cores + 1))
        .join()
        .unwrap();
    assert_eq!(pinned, cores > 0);
}
