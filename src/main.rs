use clap::Parser;
use tracing_subscriber::EnvFilter;

use credvault::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Init => credvault::cli::commands::init::execute(&cli),
        Commands::Add {
            ref title,
            ref username,
            ref notes,
            ref id,
        } => credvault::cli::commands::add::execute(&cli, title, username, notes, id.as_deref()),
        Commands::List => credvault::cli::commands::list::execute(&cli),
        Commands::Show { ref id, reveal } => {
            credvault::cli::commands::show::execute(&cli, id, reveal)
        }
        Commands::Delete { ref id, force } => {
            credvault::cli::commands::delete::execute(&cli, id, force)
        }
        Commands::Sync { ref action } => credvault::cli::commands::sync::execute(&cli, action),
    };

    if let Err(e) = result {
        credvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Log to stderr so stdout stays clean for command output.
/// `RUST_LOG` wins over `-v` when set.
fn setup_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
