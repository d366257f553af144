// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! keyrack - a local single-user password vault.
//!
//! This is the binary entry point for the keyrack daemon.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;

/// keyrack - a local single-user password vault.
#[derive(Parser, Debug)]
#[command(name = "keyrack", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the keyrack vault server.
    Serve,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match keyrack_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            keyrack_config::render_errors(errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("keyrack serve failed: {e}");
                std::process::exit(1);
            }
        }
        None => {
            println!("keyrack: use --help for available commands");
        }
    }
}
