//! Trellis - Entry Point
//!
//! Binary entry point serving the account application.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `trellis serve` | Start the HTTP server and scheduled jobs |
//! | `trellis routes` | Print the route table and exit |

// Force-link trellis-providers to ensure linkme inventory registrations are included
extern crate trellis_providers;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use trellis::accounts;
use trellis::infrastructure::config::ConfigLoader;

/// Command line interface for Trellis
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(about = "Trellis - declarative service framework")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print every route and exit
    Routes,
}

fn loader(cli: &Cli) -> ConfigLoader {
    match &cli.config {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = loader(&cli)
        .load()
        .context("failed to load configuration")?;

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            accounts::application()
                .with_config(config)
                .build()
                .context("failed to bootstrap application")?
                .run()
                .await
                .context("server terminated with an error")?;
        }
        Command::Routes => {
            let app = accounts::application()
                .with_config(config)
                .with_logging(false)
                .build()
                .context("failed to bootstrap application")?;
            for line in app.routes().describe() {
                println!("{line}");
            }
        }
    }
    Ok(())
}
