use kux_kernel::verify_bytes;

fn fixture(name: &str) -> Vec<u8> {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .join("document.json");
    std::fs::read(&path).unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()))
}

#[test]
fn happy_path_verdict_shape() {
    insta::assert_json_snapshot!(verify_bytes(&fixture("happy_path_svg")), @r#"
    {
      "deterministic_projection": true,
      "entropy_valid": true,
      "errors": [],
      "passed": true,
      "replay_identity_valid": true,
      "schema_valid": true
    }
    "#);
}

#[test]
fn hash_mismatch_verdict_shape() {
    insta::assert_json_snapshot!(verify_bytes(&fixture("hash_mismatch")), @r#"
    {
      "deterministic_projection": true,
      "entropy_valid": true,
      "errors": [
        "replay.hash_projection does not match deterministic projection hash"
      ],
      "passed": false,
      "replay_identity_valid": false,
      "schema_valid": true
    }
    "#);
}
