use clap::Parser;

use analyzer::runtime::{boot, cli::Cli, run};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    boot::init_logging();
    let cli = Cli::parse();
    let service = boot::boot(cli.config.as_deref())?;
    run::run(&service, &cli).await
}
