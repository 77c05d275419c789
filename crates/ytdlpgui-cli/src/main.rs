mod args;
mod commands;
mod prompt;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use ytdlpgui_core::{AppPaths, AppState};

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Session progress is printed directly; logs are for -v and up
    let filter = match cli.verbose {
        0 => "ytdlpgui=warn",
        1 => "ytdlpgui=info",
        2 => "ytdlpgui=debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let paths = match cli.data_dir {
        Some(ref dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
            AppPaths::new(dir)
        }
        None => AppPaths::from_current_dir().context("Could not determine the working directory")?,
    };
    let mut state = AppState::open(paths);

    match cli.command {
        Some(Commands::Download { url, options }) => {
            commands::download::run(&url, &options, &mut state).await
        }
        Some(Commands::History { action }) => commands::history::run(action, &mut state).await,
        Some(Commands::Tags { action }) => commands::tags::run(action, &mut state).await,
        Some(Commands::Settings { action }) => commands::settings::run(action, &mut state).await,
        Some(Commands::Cookie { action }) => commands::cookie::run(action, &state).await,
        Some(Commands::Open) => commands::open::run(&state).await,
        Some(Commands::Doctor) => commands::doctor::run(&state).await,
        None => {
            // If URL provided directly, treat as download command
            if let Some(url) = cli.url {
                commands::download::run(&url, &cli.options, &mut state).await
            } else {
                use clap::CommandFactory;
                Cli::command().print_help()?;
                println!();
                Ok(())
            }
        }
    }
}
