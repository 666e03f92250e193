//! Dust Vacuum CLI - archives files older than a given number of years.

use clap::Parser;
use std::io::{self, IsTerminal};
use tracing_subscriber::EnvFilter;
use vacuum_cli::output::{confirm_zero_age, Formatter};
use vacuum_cli::{app, Cli};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> vacuum_cli::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let formatter = Formatter::new(io::stdout().is_terminal());
    println!("{}\n", formatter.banner());

    let settings = app::load_settings(&cli)?;
    app::validate(&settings)?;
    println!("{}\n", formatter.settings(&settings));

    if settings.vacuum.min_age_years == 0 && !settings.assume_yes {
        println!("{}", formatter.zero_age_warning());
        if !confirm_zero_age(io::stdin().lock(), io::stdout())? {
            println!("{}", formatter.info("Aborted!"));
            return Ok(());
        }
    }

    let recorder = app::recorder_for(&settings);
    let stats = app::archive(&settings, recorder).await?;

    println!("{}", formatter.summary(&stats));
    Ok(())
}
