// Chambers orchestration router
// Main entry point for the chambers binary

use chambers_engine::cli::{Cli, Command, ConfigAction};
use chambers_engine::config::Config;
use chambers_engine::handlers::{
    handle_ask, handle_config_path, handle_config_show, handle_history, handle_route,
    handle_serve, OutputFormat,
};
use chambers_engine::telemetry::init_telemetry_with_level;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // `config path` must work even when the file is unusable
    if let Command::Config {
        action: ConfigAction::Path,
    } = &cli.command
    {
        return handle_config_path(cli.config.as_deref());
    }

    // Load configuration (or use custom path if provided)
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };

    // RUST_LOG still wins over both
    let level = cli.log.as_deref().unwrap_or(&config.core.log_level);
    init_telemetry_with_level(level);

    let version = env!("CARGO_PKG_VERSION");
    let commit = env!("GIT_COMMIT_HASH");
    let timestamp = env!("BUILD_TIMESTAMP");

    tracing::info!("Chambers v{} ({} - {})", version, commit, timestamp);

    // Determine output format
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    // Handle commands
    match cli.command {
        Command::Serve { bind } => handle_serve(&config, bind).await,

        Command::Ask { text, conversation } => {
            handle_ask(&text, &conversation, &config, format).await
        }

        Command::Route { text } => handle_route(&text, &config, format).await,

        Command::History { conversation } => {
            handle_history(&conversation, &config, format).await
        }

        Command::Config { action } => match action {
            ConfigAction::Path => handle_config_path(cli.config.as_deref()),
            ConfigAction::Show => handle_config_show(&config, format),
        },
    }
}
