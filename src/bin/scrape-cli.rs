#[path = "scrape-cli/args.rs"]
mod args;
#[path = "scrape-cli/commands.rs"]
mod commands;
#[path = "scrape-cli/logging.rs"]
mod logging;

use clap::Parser;

use crate::args::CliArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let _logger = logging::init_logging(&args.log_level, args.log_file.as_deref())?;
    commands::run(args).await
}
