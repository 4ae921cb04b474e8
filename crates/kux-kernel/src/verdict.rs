//! The conformance verdict.

use crate::error::{INPUT_DEFECT_CLASSES, KuxError};
use crate::replay::ReplayIdentity;
use crate::schema::{Findings, Sections};
use serde::{Deserialize, Serialize};

/// Error-text marker that keeps a finding out of the `schema_valid` count.
const IDENTITY_MARKER: &str = "hash_projection";

/// Named predicates plus every finding, in accumulation order.
///
/// Fields are declared in lexicographic order so serialized verdicts have
/// sorted keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub deterministic_projection: bool,
    pub entropy_valid: bool,
    pub errors: Vec<String>,
    pub passed: bool,
    pub replay_identity_valid: bool,
    pub schema_valid: bool,
}

impl Verdict {
    /// Combine section state, the identity outcome, and accumulated findings.
    ///
    /// `schema_valid` ignores findings that mention `hash_projection`: the
    /// identity proof is tracked separately from structural defects.
    pub fn aggregate(
        sections: &Sections<'_>,
        identity: &ReplayIdentity,
        findings: Findings,
    ) -> Self {
        let errors = findings.into_errors();
        let schema_valid = errors.iter().all(|e| e.contains(IDENTITY_MARKER));
        let entropy_valid = sections.entropy_valid();
        let replay_identity_valid = identity.is_valid();
        let deterministic_projection = sections.deterministic_projection();
        let passed =
            entropy_valid && replay_identity_valid && deterministic_projection && errors.is_empty();

        Self {
            deterministic_projection,
            entropy_valid,
            errors,
            passed,
            replay_identity_valid,
            schema_valid,
        }
    }

    /// Synthetic verdict for input that never parsed into a document.
    pub fn invalid_input(message: impl std::fmt::Display) -> Self {
        Self {
            deterministic_projection: false,
            entropy_valid: false,
            errors: vec![format!("invalid_json: {message}")],
            passed: false,
            replay_identity_valid: false,
            schema_valid: false,
        }
    }

    /// Synthetic verdict for input that could not be read or parsed. The
    /// single error carries the failure class as its tag.
    pub fn from_input_error(err: &KuxError) -> Self {
        Self {
            errors: vec![err.to_string()],
            ..Self::invalid_input("")
        }
    }

    /// The verdict stands in for input that never reached the verifier.
    pub fn is_input_defect(&self) -> bool {
        let [only] = self.errors.as_slice() else {
            return false;
        };
        !self.passed
            && INPUT_DEFECT_CLASSES.iter().any(|class| {
                only.strip_prefix(*class)
                    .is_some_and(|rest| rest.starts_with(": "))
            })
    }

    pub fn is_conformant(&self) -> bool {
        self.passed
    }
}
