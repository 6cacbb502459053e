use clap::Parser;
use keychain::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to stderr; RUST_LOG=keychain=debug for verbose output.
    // Nothing below `debug` ever includes keys, passwords, domains or secrets.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("keychain=warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => keychain::cli::commands::init::execute(&cli),
        Commands::Set {
            ref domain,
            ref value,
        } => keychain::cli::commands::set::execute(&cli, domain, value.as_deref()),
        Commands::Get { ref domain, copy } => {
            keychain::cli::commands::get::execute(&cli, domain, copy)
        }
        Commands::Remove { ref domain, force } => {
            keychain::cli::commands::remove::execute(&cli, domain, force)
        }
        Commands::Verify => keychain::cli::commands::verify::execute(&cli),
        Commands::Completions { shell } => keychain::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        keychain::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
