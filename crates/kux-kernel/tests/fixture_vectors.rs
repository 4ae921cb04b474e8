//! Integration tests: run the K-UX conformance vectors.
//!
//! Each fixture in tests/fixtures/ has:
//! - document.json: the K-UX document under test
//! - expect.json: the expected verdict
//!
//! The expected verdicts were produced independently of this crate, so a
//! passing run is also a cross-implementation agreement check on the
//! projection hash.

use kux_kernel::{Verdict, verify_bytes};
use serde_json::Value;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn read_fixture(name: &str, file: &str) -> Vec<u8> {
    let path = fixtures_dir().join(name).join(file);
    std::fs::read(&path).unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()))
}

fn run_fixture(name: &str) -> Verdict {
    let verdict = verify_bytes(&read_fixture(name, "document.json"));
    let expected: Value = serde_json::from_slice(&read_fixture(name, "expect.json"))
        .unwrap_or_else(|e| panic!("failed to parse expect.json for {name}: {e}"));
    let got = serde_json::to_value(&verdict).expect("verdict serializes");

    assert_eq!(
        got,
        expected,
        "\n\nFixture: {name}\n\nGot:\n{}\n\nExpected:\n{}\n",
        serde_json::to_string_pretty(&got).unwrap(),
        serde_json::to_string_pretty(&expected).unwrap(),
    );
    verdict
}

#[test]
fn happy_path_svg() {
    let verdict = run_fixture("happy_path_svg");
    assert!(verdict.passed);
    assert!(verdict.errors.is_empty());
}

#[test]
fn entropy_off_by_epsilon() {
    let verdict = run_fixture("entropy_off_by_epsilon");
    assert!(!verdict.entropy_valid);
    assert!(!verdict.passed);
}

#[test]
fn mode_outside_closed_set() {
    let verdict = run_fixture("mode_outside_closed_set");
    assert_eq!(
        verdict.errors,
        vec!["projection.mode must be one of svg|dom|css|canvas|terminal"]
    );
    assert!(!verdict.passed);
}

#[test]
fn animation_quiet() {
    assert!(run_fixture("animation_quiet").passed);
}

#[test]
fn animation_allowed() {
    assert!(!run_fixture("animation_allowed").passed);
}

#[test]
fn hash_mismatch() {
    let verdict = run_fixture("hash_mismatch");
    assert!(verdict.schema_valid);
    assert!(!verdict.replay_identity_valid);
}

#[test]
fn many_defects() {
    let verdict = run_fixture("many_defects");
    // Seven independent structural rules broken across five sections.
    assert!(verdict.errors.len() >= 7);
}

#[test]
fn non_record_sections() {
    let verdict = run_fixture("non_record_sections");
    assert!(verdict.errors.is_empty());
    assert!(!verdict.entropy_valid);
    assert!(!verdict.passed);
}

#[test]
fn non_ascii_styling() {
    assert!(run_fixture("non_ascii_styling").passed);
}

#[test]
fn verification_is_deterministic() {
    for name in ["happy_path_svg", "many_defects", "non_ascii_styling"] {
        let bytes = read_fixture(name, "document.json");
        let first = serde_json::to_vec(&verify_bytes(&bytes)).unwrap();
        let second = serde_json::to_vec(&verify_bytes(&bytes)).unwrap();
        assert_eq!(first, second, "verdict drifted for {name}");
    }
}
