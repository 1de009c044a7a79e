//! databench - Main entry point

use clap::Parser;
use databench::cli::{cmd_clean, cmd_profile, cmd_train, Cli, Commands};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "databench=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Clean { data, output } => cmd_clean(&data, &output)?,
        Commands::Profile { data, column } => cmd_profile(&data, column.as_deref())?,
        Commands::Train {
            data,
            target,
            out_dir,
            outliers,
        } => cmd_train(&data, &target, &out_dir, &outliers)?,
    }

    Ok(())
}
