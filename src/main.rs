//! Companion - local chat CLI
//!
//! Main entry point for the Companion chat application.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use companion::cli::{Cli, Commands, ModelCommand, SessionCommand};
use companion::commands;
use companion::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;
    config.validate()?;

    match cli.command {
        Commands::Chat { model, host } => {
            tracing::info!("Starting interactive chat");
            if let Some(m) = &model {
                tracing::debug!("Using model override: {}", m);
            }
            if let Some(h) = &host {
                tracing::debug!("Using host override: {}", h);
            }

            commands::chat::run_chat(config, model, host).await?;
            Ok(())
        }
        Commands::Sessions { command } => match command {
            SessionCommand::List => {
                commands::sessions::list_sessions(&config)?;
                Ok(())
            }
            SessionCommand::Delete { id } => {
                commands::sessions::delete_session(&config, &id)?;
                Ok(())
            }
        },
        Commands::Models { command } => match command {
            ModelCommand::List => {
                commands::models::list_models(&config)?;
                Ok(())
            }
        },
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "companion=debug"
    } else {
        "companion=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
