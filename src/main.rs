use aicmd::app::App;
use aicmd::{config, logging};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "aicmd", version, about = "A terminal that can turn natural language into shell commands")]
struct Cli {
    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start in AI mode
    #[arg(long)]
    ai: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Log debug information to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env file is fine
    dotenv::dotenv().ok();
    logging::init_logging(cli.verbose);

    let config_path = match cli.config {
        Some(path) => path,
        None => config::get_config_path()?,
    };
    let config = config::Config::load_or_create(&config_path)?;
    tracing::debug!(path = %config_path.display(), "loaded config");

    if cli.no_color || !config.display.color_output {
        colored::control::set_override(false);
    }

    let cwd = std::env::current_dir().context("Could not determine the working directory")?;
    let mut app = App::new(config, cwd)?;
    app.run(cli.ai).await
}
