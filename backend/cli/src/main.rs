mod app;
mod status_cmd;

use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Contact intake: Twilio webhook to Google Sheets with a live feed")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the intake server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Query a running server's health endpoint
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = intake_config::load();

    intake_logging::init_logger(
        &config.server.log_level,
        config.server.log_dir.as_deref().map(Path::new),
    );

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            app::run_server(config).await?;
        }
        Commands::Status => status_cmd::run(&config).await?,
    }

    Ok(())
}
