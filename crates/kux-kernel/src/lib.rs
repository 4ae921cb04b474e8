//! # K-UX Kernel
//!
//! Deterministic conformance verifier for K-UX v1 documents. A document
//! asserts an identity chain: a collapsed source, a projection of it, and a
//! replay record whose `hash_projection` must be recomputable from the two.
//!
//! ## Pipeline
//!
//! ```text
//! Document (serde_json::Value)
//!     │
//! schema::validate_document   ← required keys, literals, closed sets
//!     │   (Sections, Findings)
//! replay::check_replay_identity ← recompute hash::ProjectionKey digest
//!     │   ReplayIdentity
//! Verdict::aggregate          ← named predicates + ordered errors
//! ```
//!
//! Verification is a pure function: no I/O, no clock, no shared state.

pub mod error;
pub mod hash;
pub mod replay;
pub mod schema;
pub mod verdict;

pub use error::{INPUT_DEFECT_CLASSES, KuxError};
pub use hash::{HASH_PREFIX, ProjectionKey, compute_projection_hash};
pub use replay::{HASH_MISMATCH_ERROR, ReplayIdentity, check_replay_identity};
pub use schema::{Findings, Invariant, ProjectionMode, Sections, validate_document};
pub use verdict::Verdict;

use serde_json::Value;

/// Verify a parsed document.
pub fn verify_document(document: &Value) -> Verdict {
    let (sections, mut findings) = validate_document(document);
    tracing::debug!(structural = findings.len(), "schema scan complete");

    let identity = check_replay_identity(&sections, &mut findings);
    let verdict = Verdict::aggregate(&sections, &identity, findings);
    tracing::info!(
        passed = verdict.passed,
        errors = verdict.errors.len(),
        projection_hash = identity.expected_hash(),
        "k-ux verdict"
    );
    verdict
}

/// Parse a document from JSON bytes.
pub fn parse_document(bytes: &[u8]) -> Result<Value, KuxError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Parse then verify. Unparseable input yields [`Verdict::invalid_input`]
/// without running the verifier.
pub fn verify_bytes(bytes: &[u8]) -> Verdict {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(document) => verify_document(&document),
        Err(err) => Verdict::invalid_input(err),
    }
}
