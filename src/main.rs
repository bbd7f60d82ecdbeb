//! authsetup - Generate auth signing keys and secrets for local development.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use authsetup::cli::output;
use authsetup::cli::{execute, Cli};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("AUTHSETUP_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("authsetup=debug")
        } else {
            EnvFilter::new("authsetup=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli) {
        output::error(&e.to_string());
        if let Some(hint) = e.hint() {
            output::error_hint(hint);
        }
        std::process::exit(e.exit_code());
    }
}
