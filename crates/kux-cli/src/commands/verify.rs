use crate::support::{print_json_or_exit, read_input, yes_no};
use kux_kernel::{Verdict, verify_bytes};

pub fn run(document: String, json_output: bool) {
    let verdict = match read_input(&document) {
        Ok(bytes) => verify_bytes(&bytes),
        Err(err) => Verdict::from_input_error(&err),
    };
    let input_defect = verdict.is_input_defect();
    if input_defect {
        tracing::warn!(document = %document, "input unreadable or not JSON; verifier skipped");
    }

    if json_output {
        print_json_or_exit(&verdict);
    } else {
        print_human_summary(&document, &verdict);
    }

    if input_defect {
        std::process::exit(2);
    }
    if !verdict.is_conformant() {
        std::process::exit(1);
    }
}

fn print_human_summary(document: &str, verdict: &Verdict) {
    println!("kux verify {document}");
    println!("  Schema valid: {}", yes_no(verdict.schema_valid));
    println!("  Entropy valid: {}", yes_no(verdict.entropy_valid));
    println!(
        "  Replay identity valid: {}",
        yes_no(verdict.replay_identity_valid)
    );
    println!(
        "  Deterministic projection: {}",
        yes_no(verdict.deterministic_projection)
    );
    if verdict.passed {
        println!("  Result: conformant");
    } else {
        println!("  Result: non-conformant (errors={})", verdict.errors.len());
        for err in &verdict.errors {
            println!("    - {err}");
        }
    }
}
