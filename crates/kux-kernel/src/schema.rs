//! Structural checks over the four K-UX sections.
//!
//! Every rule is evaluated; nothing short-circuits. Violations accumulate in
//! [`Findings`] in section-scan order: root markers, source, projection,
//! replay, proof_surface.

use crate::hash::canonical_json;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

pub const KUX_VERSION: &str = "v1";
pub const KUX_STATUS: &str = "canonical";
pub const CANONICAL_ENTROPY: f64 = 0.21;
pub const DETERMINISTIC_LAYOUT: &str = "deterministic";

const SECTION_KEYS: [&str; 4] = ["source", "projection", "replay", "proof_surface"];
const SOURCE_KEYS: [&str; 5] = [
    "collapse_result_hash",
    "collapse_trace_hash",
    "entropy",
    "invariants",
    "compression_ratio",
];
const SOURCE_HASH_KEYS: [&str; 2] = ["collapse_result_hash", "collapse_trace_hash"];
const PROJECTION_KEYS: [&str; 3] = ["mode", "layout", "styling"];
const REPLAY_KEYS: [&str; 4] = [
    "replay_identity_required",
    "hash_projection",
    "input_hash",
    "render_deterministic",
];
const REPLAY_HASH_KEYS: [&str; 2] = ["hash_projection", "input_hash"];
const PROOF_SURFACE_KEYS: [&str; 3] = [
    "show_entropy",
    "show_invariants",
    "show_compression_ratio",
];

static CONTENT_HASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\Asha256:[a-f0-9]{64}\z").expect("content hash pattern"));

/// Canonical collapse invariants a source may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Invariant {
    CollapseOnly,
    FieldPerception,
    CompressionLaw,
    UnreachableStates,
}

impl Invariant {
    pub const ALL: [Invariant; 4] = [
        Invariant::CollapseOnly,
        Invariant::FieldPerception,
        Invariant::CompressionLaw,
        Invariant::UnreachableStates,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Invariant::CollapseOnly => "collapse_only",
            Invariant::FieldPerception => "field_perception",
            Invariant::CompressionLaw => "compression_law",
            Invariant::UnreachableStates => "unreachable_states",
        }
    }
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Invariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Invariant::ALL
            .into_iter()
            .find(|inv| inv.as_str() == s)
            .ok_or_else(|| format!("unknown invariant: {s}"))
    }
}

/// Rendering targets a projection may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    Svg,
    Dom,
    Css,
    Canvas,
    Terminal,
}

impl ProjectionMode {
    pub const ALL: [ProjectionMode; 5] = [
        ProjectionMode::Svg,
        ProjectionMode::Dom,
        ProjectionMode::Css,
        ProjectionMode::Canvas,
        ProjectionMode::Terminal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectionMode::Svg => "svg",
            ProjectionMode::Dom => "dom",
            ProjectionMode::Css => "css",
            ProjectionMode::Canvas => "canvas",
            ProjectionMode::Terminal => "terminal",
        }
    }
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectionMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| format!("unknown projection mode: {s}"))
    }
}

/// Ordered accumulator of human-readable violations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    errors: Vec<String>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    /// Record `<path>.<key>: missing` for every absent key, in `keys` order.
    pub fn require_keys(&mut self, record: &Map<String, Value>, keys: &[&str], path: &str) {
        for key in keys {
            if !record.contains_key(*key) {
                self.push(format!("{path}.{key}: missing"));
            }
        }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

/// A section as seen by later stages.
///
/// `None` means the section is present but not a record; an absent section
/// reads as an empty record so each of its required keys is reported.
pub type Section<'a> = Option<Cow<'a, Map<String, Value>>>;

/// The four sections of a document after structural checks.
#[derive(Debug, Clone, PartialEq)]
pub struct Sections<'a> {
    pub source: Section<'a>,
    pub projection: Section<'a>,
    pub replay: Section<'a>,
    pub proof_surface: Section<'a>,
}

impl<'a> Sections<'a> {
    fn from_root(root: Option<&'a Map<String, Value>>) -> Self {
        let section = |name: &str| -> Section<'a> {
            match root.and_then(|root| root.get(name)) {
                None => Some(Cow::Owned(Map::new())),
                Some(Value::Object(map)) => Some(Cow::Borrowed(map)),
                Some(_) => None,
            }
        };
        Self {
            source: section("source"),
            projection: section("projection"),
            replay: section("replay"),
            proof_surface: section("proof_surface"),
        }
    }

    /// Source record is present and declares the canonical entropy.
    pub fn entropy_valid(&self) -> bool {
        self.source
            .as_deref()
            .is_some_and(|source| is_canonical_entropy(source.get("entropy")))
    }

    /// Layout is deterministic and the replay declares deterministic rendering.
    pub fn deterministic_projection(&self) -> bool {
        let layout_ok = self.projection.as_deref().is_some_and(|projection| {
            projection.get("layout").and_then(Value::as_str) == Some(DETERMINISTIC_LAYOUT)
        });
        let render_ok = self
            .replay
            .as_deref()
            .is_some_and(|replay| is_true(replay.get("render_deterministic")));
        layout_ok && render_ok
    }
}

/// Walk the root markers and all four sections, collecting every violation.
///
/// A root that is not an object is treated as an empty mapping.
pub fn validate_document(document: &Value) -> (Sections<'_>, Findings) {
    let root = document.as_object();
    let mut findings = Findings::new();

    let marker = |key: &str| root.and_then(|root| root.get(key)).and_then(Value::as_str);
    if marker("@kux") != Some(KUX_VERSION) {
        findings.push(format!("@kux must equal '{KUX_VERSION}'"));
    }
    if marker("@status") != Some(KUX_STATUS) {
        findings.push(format!("@status must equal '{KUX_STATUS}'"));
    }

    match root {
        Some(root) => findings.require_keys(root, &SECTION_KEYS, "root"),
        None => findings.require_keys(&Map::new(), &SECTION_KEYS, "root"),
    }

    let sections = Sections::from_root(root);
    if let Some(source) = sections.source.as_deref() {
        check_source(source, &mut findings);
    }
    if let Some(projection) = sections.projection.as_deref() {
        check_projection(projection, &mut findings);
    }
    if let Some(replay) = sections.replay.as_deref() {
        check_replay(replay, &mut findings);
    }
    if let Some(proof_surface) = sections.proof_surface.as_deref() {
        check_proof_surface(proof_surface, &mut findings);
    }

    (sections, findings)
}

pub fn check_source(source: &Map<String, Value>, findings: &mut Findings) {
    findings.require_keys(source, &SOURCE_KEYS, "source");

    for key in SOURCE_HASH_KEYS {
        if !is_content_hash(source.get(key)) {
            findings.push(format!("source.{key} must match sha256:[a-f0-9]{{64}}"));
        }
    }

    if !is_canonical_entropy(source.get("entropy")) {
        findings.push(format!("source.entropy must equal {CANONICAL_ENTROPY}"));
    }

    match source.get("invariants").and_then(Value::as_array) {
        Some(items) if !items.is_empty() && !has_duplicates(items) => {
            let canonical = items
                .iter()
                .all(|item| item.as_str().is_some_and(|s| s.parse::<Invariant>().is_ok()));
            if !canonical {
                findings.push("source.invariants contains non-canonical values");
            }
        }
        _ => findings.push("source.invariants must be a non-empty unique list"),
    }

    let ratio_ok = source
        .get("compression_ratio")
        .and_then(Value::as_f64)
        .is_some_and(|ratio| ratio >= 0.0);
    if !ratio_ok {
        findings.push("source.compression_ratio must be a number >= 0");
    }
}

pub fn check_projection(projection: &Map<String, Value>, findings: &mut Findings) {
    findings.require_keys(projection, &PROJECTION_KEYS, "projection");

    let mode_ok = projection
        .get("mode")
        .and_then(Value::as_str)
        .is_some_and(|mode| mode.parse::<ProjectionMode>().is_ok());
    if !mode_ok {
        let modes: Vec<&str> = ProjectionMode::ALL.iter().map(|m| m.as_str()).collect();
        findings.push(format!("projection.mode must be one of {}", modes.join("|")));
    }

    if projection.get("layout").and_then(Value::as_str) != Some(DETERMINISTIC_LAYOUT) {
        findings.push(format!("projection.layout must equal '{DETERMINISTIC_LAYOUT}'"));
    }

    match projection.get("styling").and_then(Value::as_object) {
        None => findings.push("projection.styling must be an object"),
        Some(styling) => {
            if !is_true(styling.get("pure")) {
                findings.push("projection.styling.pure must be true");
            }
            if !is_true(styling.get("no_runtime_injection")) {
                findings.push("projection.styling.no_runtime_injection must be true");
            }
        }
    }

    // A non-record animation is tolerated; only its flags are policed.
    if let Some(animation) = projection.get("animation").and_then(Value::as_object) {
        for flag in ["allowed", "async"] {
            if !is_unset_or_false(animation.get(flag)) {
                findings.push(format!("projection.animation.{flag} must be false when provided"));
            }
        }
    }
}

pub fn check_replay(replay: &Map<String, Value>, findings: &mut Findings) {
    findings.require_keys(replay, &REPLAY_KEYS, "replay");

    if !is_true(replay.get("replay_identity_required")) {
        findings.push("replay.replay_identity_required must be true");
    }
    if !is_true(replay.get("render_deterministic")) {
        findings.push("replay.render_deterministic must be true");
    }
    for key in REPLAY_HASH_KEYS {
        if !is_content_hash(replay.get(key)) {
            findings.push(format!("replay.{key} must match sha256:[a-f0-9]{{64}}"));
        }
    }
}

pub fn check_proof_surface(proof_surface: &Map<String, Value>, findings: &mut Findings) {
    findings.require_keys(proof_surface, &PROOF_SURFACE_KEYS, "proof_surface");
}

/// `sha256:` followed by exactly 64 lowercase hex digits.
pub fn is_content_hash(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|s| CONTENT_HASH_RE.is_match(s))
}

fn is_canonical_entropy(value: Option<&Value>) -> bool {
    value.and_then(Value::as_f64) == Some(CANONICAL_ENTROPY)
}

fn is_true(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

fn is_unset_or_false(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null) | Some(Value::Bool(false)))
}

fn has_duplicates(items: &[Value]) -> bool {
    let mut seen = BTreeSet::new();
    items.iter().any(|item| !seen.insert(canonical_json(item)))
}
