mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "platprops", version, about = "Show the platform properties of this host")]
struct Cli {
    /// Path to config file (default: ~/.config/platprops/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (overrides config and RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect and display all properties
    Show {
        /// Output format (table, json or properties)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Print the canonical IANA name for encoding names
    Normalize {
        /// Encoding names, e.g. ISO8859-1
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Print one system property, e.g. `os.name`
    Get {
        key: String,
    },
}

fn init_tracing(level_flag: Option<&str>, config_level: &str, json: bool) {
    let filter = match level_flag {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config_level)),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => platprops::config::load_from(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => platprops::config::load().context("loading configuration")?,
    };

    init_tracing(cli.log_level.as_deref(), &cfg.log_level, cli.log_json);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "platprops starting");

    match cli.command {
        Commands::Show { format } => commands::show::run(cfg, &format),
        Commands::Normalize { names } => commands::normalize::run(&names),
        Commands::Get { key } => commands::get::run(cfg, &key),
    }
}
