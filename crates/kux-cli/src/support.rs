use kux_kernel::KuxError;
use serde::Serialize;
use std::fs;
use tracing::Level;

/// Install the stderr diagnostics subscriber. Stdout stays reserved for
/// command output.
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn read_input(path: &str) -> Result<Vec<u8>, KuxError> {
    fs::read(path).map_err(|source| KuxError::Io {
        path: path.to_string(),
        source,
    })
}

pub fn emit_error(err: KuxError) -> ! {
    eprintln!("error: {err}");
    std::process::exit(2);
}

pub fn read_input_or_exit(path: &str) -> Vec<u8> {
    read_input(path).unwrap_or_else(|err| emit_error(err))
}

/// Pretty JSON with object keys sorted.
pub fn render_json<T: Serialize>(value: &T) -> Result<String, KuxError> {
    let value = serde_json::to_value(value).map_err(|err| KuxError::Render(err.to_string()))?;
    serde_json::to_string_pretty(&value).map_err(|err| KuxError::Render(err.to_string()))
}

pub fn print_json_or_exit<T: Serialize>(value: &T) {
    let rendered = render_json(value).unwrap_or_else(|err| emit_error(err));
    println!("{rendered}");
}

pub fn yes_no(ok: bool) -> &'static str {
    if ok { "yes" } else { "no" }
}
