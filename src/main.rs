mod repl;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use therapy_core::config::{AppConfig, TransportMode};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "therapy-shell",
    about = "Art-therapy practice chat simulator and session analytics",
    version,
    author
)]
struct Cli {
    /// Path to config file (default: ~/.config/therapy-shell/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Use a remote chat backend at this URL instead of the built-in scripts
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with a child persona (default)
    Chat {
        /// Persona to start with
        #[arg(short, long, default_value = "aarav")]
        persona: String,
    },

    /// Start the HTTP API server
    Serve {
        /// Bind host
        #[arg(long)]
        host: Option<String>,
        /// Bind port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Initialize default configuration file
    Init,
    /// Print config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "therapy_shell=info,warn".into()),
        )
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    if let Some(endpoint) = &cli.endpoint {
        config.transport.mode = TransportMode::Http;
        config.transport.endpoint = endpoint.clone();
    }

    tracing::info!(
        "Transport: {:?}, endpoint: {}",
        config.transport.mode,
        config.transport.endpoint
    );

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            if let Some(h) = host {
                config.server.host = h;
            }
            if let Some(p) = port {
                config.server.port = p;
            }
            therapy_server::serve(config).await?;
        }
        Some(Commands::Config { action }) => {
            handle_config_command(action, &config)?;
        }
        Some(Commands::Chat { persona }) => {
            repl::run(config, persona).await?;
        }
        None => {
            repl::run(config, "aarav".into()).await?;
        }
    }

    Ok(())
}

fn handle_config_command(action: Option<ConfigAction>, config: &AppConfig) -> Result<()> {
    match action {
        Some(ConfigAction::Show) | None => {
            let toml_str = toml::to_string_pretty(config)?;
            println!("{}", toml_str);
        }
        Some(ConfigAction::Init) => {
            let path = AppConfig::default_path();
            if path.exists() {
                println!("Config already exists at: {}", path.display());
            } else {
                config.save()?;
                println!("Created default config at: {}", path.display());
            }
        }
        Some(ConfigAction::Path) => {
            println!("{}", AppConfig::default_path().display());
        }
    }
    Ok(())
}
