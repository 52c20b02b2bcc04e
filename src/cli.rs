use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "supportctl")]
#[command(about = "Operator console for the support chatbot backend", long_about = None)]
pub struct Args {
    #[arg(long = "api-base-url", global = true, help = "Backend base URL (e.g., http://localhost:8000)")]
    pub api_base_url: Option<String>,

    #[arg(long = "client-id", global = true, help = "Client id whose data to show")]
    pub client_id: Option<String>,

    #[arg(long = "config", global = true, help = "Read settings from this file instead of the search path")]
    pub config: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", global = true, help = "Log requests and retries")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List chat sessions for a day
    Sessions {
        #[arg(long, help = "Day to show as YYYY-MM-DD (default: today)")]
        date: Option<String>,

        #[arg(long, conflicts_with = "date", help = "Show sessions from every day")]
        all_dates: bool,

        #[arg(long, help = "Keep fetching until every session is loaded")]
        all: bool,
    },

    /// Show the conversation of one session
    Transcript {
        session_id: String,

        #[arg(long, default_value_t = 1, help = "Number of message pages to load")]
        pages: u32,
    },

    /// Manage knowledge-base documents
    #[command(subcommand)]
    Docs(DocsCommand),

    /// Triage knowledge gaps
    #[command(subcommand)]
    Gaps(GapsCommand),

    /// Check that the backend is reachable
    Health,

    /// Show or initialize settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
pub enum DocsCommand {
    /// List documents
    List {
        #[arg(long, help = "Follow continuation tokens until the listing is exhausted")]
        all: bool,
    },
    /// Print a document
    Show {
        key: String,
        #[arg(long, help = "Print the stored content without processing")]
        raw: bool,
    },
    /// Ingest a page from the allowed domain
    AddUrl { url: String },
    /// Store text under a filename (`-` reads stdin)
    AddText { filename: String, source: String },
    /// Overwrite an existing document (`-` reads stdin)
    Edit { key: String, source: String },
    /// Delete a document
    Delete { key: String },
}

#[derive(Subcommand, Debug)]
pub enum GapsCommand {
    /// List open gaps
    List {
        #[arg(long, help = "Keep fetching until every gap is loaded")]
        all: bool,
    },
    /// Answer a gap
    Answer { gap_id: String, answer: String },
    /// Dismiss a gap
    Delete { gap_id: String },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective settings
    Show,
    /// Write a starter config file
    Init {
        #[arg(long, help = "Where to write it (default: ~/.config/supportctl/supportctl.yaml)")]
        path: Option<PathBuf>,
    },
}
