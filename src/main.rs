//! Variable Reflector - echo server with synthetic latency
//!
//! Answers every HTTP request with its path and JSON body after a delay drawn
//! from the configured distribution.

use clap::Parser;
use variable_reflector::{
    cli::Cli,
    config::{display_config_summary, load_config, validate_config},
    error::{AppError, ErrorReporter, Result},
    logging::LoggerFactory,
    server::{AppState, ReflectorServer},
    VERSION, PKG_NAME,
};
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    let cli = Cli::parse();
    let use_color = cli.use_colors();
    let verbose = cli.verbose || cli.debug;

    if let Err(e) = run_application(cli).await {
        ErrorReporter::new(use_color, verbose).report_error(&e);
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }
}

async fn run_application(cli: Cli) -> Result<()> {
    cli.validate().map_err(AppError::validation)?;

    if cli.should_show_topic_help() {
        println!("{}", cli.display_help());
        return Ok(());
    }

    if cli.debug {
        println!("{} v{}", PKG_NAME, VERSION);
        println!("Debug mode enabled");
        println!();
    }

    let config = load_config(cli)?;

    if !config.enable_color {
        colored::control::set_override(false);
    }

    // Warnings go out before the first request is accepted
    for warning in validate_config(&config)? {
        eprintln!("{}", warning.format(config.enable_color));
    }

    if config.debug {
        println!("Configuration loaded successfully:");
        for line in display_config_summary(&config).lines() {
            println!("  {}", line);
        }
        println!();
    }

    let factory = LoggerFactory::new(config.clone());
    let request_logger = factory.create_request_logger().await;
    let state = AppState::from_config(&config, request_logger)?;

    let server = ReflectorServer::bind(config.socket_addr()?, state).await?;
    server.serve().await
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) | AppError::Validation(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Shapes are u, m, l or x (see --help-topic shapes)");
            eprintln!("  - Latency bounds must be finite numbers of seconds");
            eprintln!("  - Check REFLECTOR_* variables and your .env file (see --help-topic config)");
        }
        AppError::Server(_) => {
            eprintln!();
            eprintln!("Server troubleshooting:");
            eprintln!("  - Another process may already be listening on that port");
            eprintln!("  - Ports below 1024 usually need elevated privileges");
            eprintln!("  - Try a different address with --listen-port");
        }
        _ => {}
    }
}
