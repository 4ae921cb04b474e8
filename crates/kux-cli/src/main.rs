//! K-UX CLI: the `kux` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    support::init_tracing(cli.verbose);

    match cli.command {
        Commands::Verify { document, json } => commands::verify::run(document, json),

        Commands::Hash { document, json } => commands::hash::run(document, json),
    }
}
