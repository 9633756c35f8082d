use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use flight_report::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    init_tracing(args.verbose, args.json_logs);

    match args.get_command() {
        cli::Commands::Report(report_args) => {
            commands::report::execute(&args.config, report_args).await?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&args.config)?,
            cli::ConfigCommands::Validate => commands::config::validate(&args.config)?,
        },
        cli::Commands::Version => {
            println!("flight-report v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
