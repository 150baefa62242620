use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use storefront_theme::cli::Cli;
use storefront_theme::{HttpGateway, StyleVars, ThemeError, ThemeStore, handle, settings};

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Ask on stderr, read the answer from stdin. Anything but y/yes declines.
fn confirm(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    let _ = io::stderr().flush();
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

async fn run(cli: Cli) -> Result<String, ThemeError> {
    let console = settings::load(cli.settings.as_deref())?;
    debug!(backend = %console.backend_url, "settings loaded");

    let gateway = HttpGateway::from_settings(&console)?;
    let store = ThemeStore::new(gateway, StyleVars::new()).strict_import(console.strict_import);

    let action = cli.action();
    let result = handle(&store, &action, &console, confirm).await?;
    Ok(result.to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
