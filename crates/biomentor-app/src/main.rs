use anyhow::Result;
use clap::Parser;

use biomentor::app::{run_repl_mode, run_web_server, setup_from_cli};
use biomentor::{Cli, RunMode};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let app_config = setup_from_cli(&cli)?;

    match cli.mode() {
        RunMode::Web => run_web_server(&cli, app_config).await,
        RunMode::Interactive => run_repl_mode(app_config).await,
    }
}
