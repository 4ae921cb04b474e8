use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "kux",
    about = "K-UX v1: deterministic conformance checks over collapse/projection/replay documents",
    version
)]
pub struct Cli {
    /// Increase diagnostic verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify a K-UX document: schema, entropy pin, replay identity
    ///
    /// Exits 0 when conformant, 1 when not, 2 when the input is unreadable
    /// or not JSON.
    Verify {
        /// Path to the K-UX JSON document
        document: String,

        /// Output the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the canonical projection hash a document's replay must declare
    Hash {
        /// Path to the K-UX JSON document
        document: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
