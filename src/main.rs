use clap::Parser;
use record_hooks::cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "record_hooks=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Migrate) => {
            record_hooks::cli::migrate::run(&cli.config)?;
        }
        Some(Commands::Org { command }) => {
            record_hooks::cli::org::run(&cli.config, command)?;
        }
        Some(Commands::Slugify { name, max_length }) => {
            record_hooks::cli::tools::slugify(&name, max_length)?;
        }
        Some(Commands::NewId { count }) => {
            record_hooks::cli::tools::new_id(&cli.config, count)?;
        }
        None => {
            // No subcommand provided, print help
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
