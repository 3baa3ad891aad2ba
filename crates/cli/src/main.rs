use clap::Parser;
use std::path::PathBuf;

mod commands;

use commands::Commands;

#[derive(Parser)]
#[command(name = "cellar")]
#[command(about = "Inspect and edit values kept by the cellar two-tier store", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the primary and overflow tiers
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Capacity of the primary tier in bytes
    #[arg(long, global = true, value_name = "BYTES")]
    quota: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = cellar_utils::tracing::init() {
        eprintln!("failed to initialise logging: {e}");
    }

    let cli = Cli::parse();
    let configuration = cellar_store::StoreConfigLoader::load()?;
    let configuration =
        cellar_store::StoreConfigLoader::apply_cli_args(configuration, cli.data_dir, cli.quota)?;
    tracing::debug!(
        source = ?configuration.source,
        data_dir = %configuration.store.data_dir.display(),
        "using store configuration"
    );

    let output = cli.command.execute(&configuration.store).await?;
    println!("{output}");
    Ok(())
}
