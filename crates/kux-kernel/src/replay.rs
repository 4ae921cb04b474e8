//! Replay identity: recompute the projection hash and compare it with the
//! declared `replay.hash_projection`.

use crate::hash::ProjectionKey;
use crate::schema::{Findings, Sections};
use serde_json::Value;

pub const HASH_MISMATCH_ERROR: &str =
    "replay.hash_projection does not match deterministic projection hash";

/// Outcome of the replay identity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayIdentity {
    /// Declared hash equals the recomputed one.
    Matched { hash: String },
    /// Declared hash differs (or is absent / not a string).
    Mismatched {
        expected: String,
        declared: Option<String>,
    },
    /// Prerequisite sections or keys are missing; nothing was compared.
    Undetermined,
}

impl ReplayIdentity {
    pub fn is_valid(&self) -> bool {
        matches!(self, ReplayIdentity::Matched { .. })
    }

    /// The recomputed projection hash, when one could be computed.
    pub fn expected_hash(&self) -> Option<&str> {
        match self {
            ReplayIdentity::Matched { hash } => Some(hash),
            ReplayIdentity::Mismatched { expected, .. } => Some(expected),
            ReplayIdentity::Undetermined => None,
        }
    }
}

/// Recompute the projection hash from raw source/projection values.
///
/// Runs whenever source, projection and replay are records and the four key
/// fields exist, regardless of whether those values passed their own schema
/// checks. A mismatch appends [`HASH_MISMATCH_ERROR`]; an undetermined check
/// adds nothing, since the missing keys are already reported.
pub fn check_replay_identity(sections: &Sections<'_>, findings: &mut Findings) -> ReplayIdentity {
    let (Some(source), Some(projection), Some(replay)) = (
        sections.source.as_deref(),
        sections.projection.as_deref(),
        sections.replay.as_deref(),
    ) else {
        return ReplayIdentity::Undetermined;
    };

    let Some(collapse_result_hash) = source.get("collapse_result_hash") else {
        return ReplayIdentity::Undetermined;
    };
    let Some(key) = ProjectionKey::from_projection(collapse_result_hash, projection) else {
        return ReplayIdentity::Undetermined;
    };

    let expected = key.digest();
    let declared = replay.get("hash_projection");
    if declared.and_then(Value::as_str) == Some(expected.as_str()) {
        ReplayIdentity::Matched { hash: expected }
    } else {
        tracing::debug!(
            expected = %expected,
            declared = ?declared,
            "projection hash mismatch"
        );
        findings.push(HASH_MISMATCH_ERROR);
        ReplayIdentity::Mismatched {
            expected,
            declared: declared.and_then(Value::as_str).map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::compute_projection_hash;
    use crate::schema::validate_document;
    use serde_json::json;

    fn document(hash_projection: Value) -> Value {
        json!({
            "source": {"collapse_result_hash": format!("sha256:{}", "a".repeat(64))},
            "projection": {
                "mode": "terminal",
                "layout": "deterministic",
                "styling": {"pure": true, "no_runtime_injection": true},
            },
            "replay": {"hash_projection": hash_projection},
        })
    }

    fn expected_for(document: &Value) -> String {
        compute_projection_hash(
            &document["source"]["collapse_result_hash"],
            document["projection"].as_object().unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn matching_hash_is_valid_without_findings() {
        let probe = document(Value::Null);
        let doc = document(json!(expected_for(&probe)));
        let (sections, _) = validate_document(&doc);
        let mut findings = Findings::new();
        let identity = check_replay_identity(&sections, &mut findings);
        assert!(identity.is_valid());
        assert!(findings.is_empty());
    }

    #[test]
    fn mismatch_appends_one_error() {
        let doc = document(json!(format!("sha256:{}", "0".repeat(64))));
        let (sections, _) = validate_document(&doc);
        let mut findings = Findings::new();
        let identity = check_replay_identity(&sections, &mut findings);
        assert!(!identity.is_valid());
        assert_eq!(identity.expected_hash(), Some(expected_for(&doc).as_str()));
        assert_eq!(findings.errors(), [HASH_MISMATCH_ERROR]);
    }

    #[test]
    fn absent_declared_hash_is_a_mismatch() {
        let mut doc = document(Value::Null);
        doc["replay"] = json!({});
        let (sections, _) = validate_document(&doc);
        let mut findings = Findings::new();
        let identity = check_replay_identity(&sections, &mut findings);
        assert!(matches!(
            identity,
            ReplayIdentity::Mismatched { declared: None, .. }
        ));
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn missing_prerequisites_are_silent() {
        let mut doc = document(Value::Null);
        doc["projection"].as_object_mut().unwrap().remove("styling");
        let (sections, _) = validate_document(&doc);
        let mut findings = Findings::new();
        assert_eq!(
            check_replay_identity(&sections, &mut findings),
            ReplayIdentity::Undetermined
        );
        assert!(findings.is_empty());

        let mut doc = document(Value::Null);
        doc["replay"] = json!("not a record");
        let (sections, _) = validate_document(&doc);
        assert_eq!(
            check_replay_identity(&sections, &mut findings),
            ReplayIdentity::Undetermined
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn raw_values_are_hashed_even_when_schema_rejects_them() {
        let mut probe = document(Value::Null);
        probe["projection"]["mode"] = json!(42);
        probe["source"]["collapse_result_hash"] = json!("not-a-hash");
        let doc = {
            let mut doc = probe.clone();
            doc["replay"]["hash_projection"] = json!(expected_for(&probe));
            doc
        };
        let (sections, _) = validate_document(&doc);
        let mut findings = Findings::new();
        assert!(check_replay_identity(&sections, &mut findings).is_valid());
    }
}
