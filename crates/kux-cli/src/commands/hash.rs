use crate::support::{emit_error, print_json_or_exit, read_input_or_exit};
use kux_kernel::{compute_projection_hash, parse_document};
use serde_json::json;

pub fn run(document: String, json_output: bool) {
    let bytes = read_input_or_exit(&document);
    let parsed = parse_document(&bytes).unwrap_or_else(|err| emit_error(err));

    let source_hash = parsed
        .get("source")
        .and_then(|source| source.get("collapse_result_hash"));
    let projection = parsed.get("projection").and_then(|p| p.as_object());

    let hash = match (source_hash, projection) {
        (Some(source_hash), Some(projection)) => compute_projection_hash(source_hash, projection),
        _ => None,
    };
    let Some(hash) = hash else {
        eprintln!(
            "error: {document} lacks source.collapse_result_hash or projection.mode/layout/styling"
        );
        std::process::exit(1);
    };

    let declared = parsed
        .get("replay")
        .and_then(|replay| replay.get("hash_projection"))
        .and_then(|declared| declared.as_str());

    if json_output {
        print_json_or_exit(&json!({
            "hash_projection": hash,
            "declared": declared,
            "matches_declared": declared == Some(hash.as_str()),
        }));
    } else {
        println!("{hash}");
    }
}
