//! Reflector Spam - sequential request generator
//!
//! Sends `--count` GETs to `<target>/health?id=<n>` one after another and
//! prints the round-trip time of each.

use clap::Parser;
use colored::*;
use variable_reflector::{
    cli::SpamCli,
    error::{ErrorReporter, Result},
    spam::{SpamClient, SpamConfig},
};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = SpamCli::parse();
    let use_color = cli.use_colors();

    if let Err(e) = run(cli, use_color).await {
        ErrorReporter::new(use_color, false).report_error(&e);
        process::exit(e.exit_code());
    }
}

async fn run(cli: SpamCli, use_color: bool) -> Result<()> {
    let config = SpamConfig {
        target: cli.target,
        path: cli.path,
        count: cli.count,
        timeout: Duration::from_secs(cli.timeout),
    };

    let client = SpamClient::new(config)?;
    let mut stdout = std::io::stdout();
    let report = client.run(&mut stdout).await?;

    if !cli.no_summary {
        let failures = report.failures();
        let failure_line = format!("failures: {}/{}", failures, report.round_trips.len());

        println!();
        if use_color && failures > 0 {
            println!("{}", failure_line.red().bold());
        } else {
            println!("{}", failure_line);
        }

        match report.summary {
            Some(summary) => println!("{}", summary),
            None => println!("no successful requests"),
        }
    }

    Ok(())
}
