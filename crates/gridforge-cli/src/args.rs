use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "gridforge", version, about = "GRIDFORGE CLI")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Store root directory (default: data)
    #[arg(long, global = true, default_value = "data")]
    pub store_root: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List documents, optionally restricted to one kind.
    List {
        /// Kind: enum|class-data|class-data-id|class-data-matrix-id|state-data
        #[arg(long)]
        kind: Option<String>,
    },

    /// Export a keyed table or matrix to CSV.
    Export {
        /// Kind: class-data-id|class-data-matrix-id
        kind: String,
        name: String,
        /// Output file (stdout when omitted).
        #[arg(long)]
        out: Option<String>,
    },

    /// Import a CSV file into a keyed table or matrix.
    Import {
        /// Kind: class-data-id|class-data-matrix-id
        kind: String,
        name: String,
        /// CSV file, header row first.
        file: String,
    },

    /// Generate C# or binary artifacts.
    Generate {
        /// Target: enum|class|table-id|table-binary|matrix-header|
        /// matrix-binary|matrix-table-id|state|all
        target: String,
        /// Document name (omitted for matrix-table-id and all).
        name: Option<String>,
    },

    /// Run store consistency checks.
    Doctor,
}
