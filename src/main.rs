use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod matching;
mod output;
mod parsing;
mod pipeline;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("mate_rearrange=debug,info")
    } else {
        EnvFilter::new("mate_rearrange=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Rearrange(args) => {
            cli::rearrange::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Inspect(args) => {
            cli::inspect::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
