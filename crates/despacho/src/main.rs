// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Despacho - last-mile delivery dispatch service.
//!
//! This is the binary entry point for the Despacho server.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod serve;

/// Despacho - last-mile delivery dispatch service.
#[derive(Parser, Debug)]
#[command(name = "despacho", version, about, long_about = None)]
struct Cli {
    /// Path to a config file (overrides the XDG hierarchy).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the dispatch server.
    Serve,
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => despacho_config::load_config_from_path(path),
        None => despacho_config::load_config(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("despacho: configuration error: {e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("despacho serve: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            // Secrets stay out of stdout.
            println!("server.host = {}", config.server.host);
            println!("server.port = {}", config.server.port);
            println!("server.log_level = {}", config.server.log_level);
            println!("storage.database_path = {}", config.storage.database_path);
            println!(
                "telegram.bot_token = {}",
                if config.telegram.bot_token.is_some() {
                    "<set>"
                } else {
                    "<unset>"
                }
            );
            println!(
                "telegram.chat_id = {}",
                config.telegram.chat_id.as_deref().unwrap_or("<unset>")
            );
            println!(
                "dispatch.correlation_capacity = {}",
                config.dispatch.correlation_capacity
            );
        }
        None => {
            println!("despacho: use --help for available commands");
        }
    }
}
