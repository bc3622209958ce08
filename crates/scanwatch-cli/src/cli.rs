use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use scanwatch_core::view::SortKey;

#[derive(Parser)]
#[command(name = "scanwatch")]
#[command(about = "Watch a barcode scanner server and review scans from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Scanner server base URL (overrides SCANWATCH_SERVER_URL and the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Optional path to the config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll for new scans and confirm unknown products interactively
    Watch {
        /// Polling interval in milliseconds (overrides config)
        #[arg(long, value_name = "MS")]
        interval_ms: Option<u64>,
    },
    /// List scans
    List {
        /// Case-insensitive filter on product name or code
        #[arg(short, long, default_value = "")]
        filter: String,
        /// Sort order
        #[arg(short, long, value_enum, default_value_t = SortArg::Newest)]
        sort: SortArg,
        /// Number of scans to show
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show scan counters and today's hourly chart
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a scan by id
    Delete {
        /// Scan id
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete every scan on the server
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Export scans
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SortArg {
    Newest,
    Oldest,
    Name,
}

impl From<SortArg> for SortKey {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Newest => Self::Newest,
            SortArg::Oldest => Self::Oldest,
            SortArg::Name => Self::Name,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl From<ExportFormat> for scanwatch_core::export::ExportFormat {
    fn from(value: ExportFormat) -> Self {
        match value {
            ExportFormat::Json => Self::Json,
            ExportFormat::Csv => Self::Csv,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update and save configuration values
    Set {
        /// Scanner server base URL
        #[arg(long, value_name = "URL")]
        server_url: Option<String>,
        /// Polling interval in milliseconds
        #[arg(long, value_name = "MS")]
        poll_interval_ms: Option<u64>,
        /// Pause after a confirmation before polling resumes, in milliseconds
        #[arg(long, value_name = "MS")]
        confirm_cooldown_ms: Option<u64>,
        /// HTTP request timeout in seconds
        #[arg(long, value_name = "SECS")]
        request_timeout_secs: Option<u64>,
    },
}
