mod commands;
mod report;

use clap::{Parser, Subcommand};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(version, about = "combat log analysis runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis over a report fixture
    Analyze {
        #[arg(short, long)]
        path: String,
        /// TOML file overriding the built-in settings
        #[arg(short, long)]
        settings: Option<String>,
    },
    /// Decode a fixture and report stream quality only
    Validate {
        #[arg(short, long)]
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_logging();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Analyze { path, settings } => commands::analyze(path, settings.as_deref()).await,
        Commands::Validate { path } => commands::validate(path),
    }
}

/// Logs go to stderr so stdout stays clean for the report itself.
fn init_logging() {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .init();
}
