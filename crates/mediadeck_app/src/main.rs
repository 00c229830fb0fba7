use clap::Parser;
use mediadeck_app::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mediadeck_app::run(Cli::parse()).await
}
