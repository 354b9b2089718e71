use std::io;

use clap::{Parser, Subcommand};
use template_store::TemplateStore;
use template_store_cli::commands::config_cmd::{self, ConfigCommands};
use template_store_cli::commands::template_cmd::{self, TemplateCommands};
use template_store_cli::config::{get_config_path, AppConfig};
use template_store_cli::errors::Error;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Template store CLI: manage plugin configuration templates in a key-value backend
#[derive(Parser)]
#[command(name = "template-store", version)]
#[command(about = "Manage plugin configuration templates", long_about = None)]
struct Cli {
    /// Path to the configuration file (defaults to ./template-store.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Backend gateway endpoint, overriding the configuration file
    #[arg(short, long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Template(TemplateCommands),

    #[command(flatten)]
    Config(ConfigCommands),
}

async fn run(cli: &Cli) -> Result<i32, Error> {
    match &cli.command {
        Commands::Config(cmd @ ConfigCommands::Init { .. }) => {
            let path = get_config_path(cli.config.as_deref());
            config_cmd::execute(cmd, &path, &AppConfig::default(), &mut io::stdout())?;
            Ok(0)
        }
        Commands::Config(cmd) => {
            let path = get_config_path(cli.config.as_deref());
            let mut app = AppConfig::resolve(cli.config.as_deref())?;
            app.store = app.store_config(cli.endpoint.as_deref());
            config_cmd::execute(cmd, &path, &app, &mut io::stdout())?;
            Ok(0)
        }
        Commands::Template(cmd) => {
            let app = AppConfig::resolve(cli.config.as_deref())?;
            let store = TemplateStore::new(app.store_config(cli.endpoint.as_deref()))?;
            let outcome = template_cmd::execute(cmd, &store, &mut io::stdout()).await?;
            Ok(outcome.exit_code())
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_env("TEMPLATE_STORE_LOG"))
        .init();

    let cli = Cli::parse();
    match run(&cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("Error: {e}");
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
