//! PiSync CLI
//!
//! Command-line entry point for the PiSync device dashboard.
//!
//! # Commands
//!
//! - `serve` - Run the HTTP server
//! - `hash-password` - Print an Argon2 hash for a password
//! - `issue-token` - Print a bearer token for a user
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// PiSync device dashboard server and tools.
#[derive(Parser)]
#[command(name = "pisync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(global = true, long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to bind (overrides PISYNC_BIND and PORT)
        #[arg(short, long)]
        bind: Option<SocketAddr>,

        /// Token signing secret (overrides JWT_SECRET)
        #[arg(long)]
        secret: Option<String>,

        /// Probability in [0, 1] that a sync attempt succeeds
        #[arg(long)]
        success_rate: Option<f64>,

        /// Do not record failed attempts in the failure log
        #[arg(long)]
        no_failure_log: bool,

        /// Seed for the sync RNG
        #[arg(long)]
        seed: Option<u64>,

        /// Maximum page size for list endpoints
        #[arg(long)]
        max_page_size: Option<usize>,

        /// Start with no devices, logs or accounts
        #[arg(long)]
        no_demo_data: bool,
    },

    /// Print an Argon2 hash for a password
    HashPassword {
        /// Password to hash
        password: String,
    },

    /// Print a bearer token for a user
    IssueToken {
        /// Token signing secret (defaults to JWT_SECRET)
        #[arg(long)]
        secret: Option<String>,

        /// Numeric user id
        #[arg(long)]
        user_id: u64,

        /// Username
        #[arg(long)]
        username: String,
    },

    /// Show version information
    Version,
}

fn init_logging(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Serve {
            bind,
            secret,
            success_rate,
            no_failure_log,
            seed,
            max_page_size,
            no_demo_data,
        } => {
            commands::serve::run(commands::serve::ServeOptions {
                bind,
                secret,
                success_rate,
                no_failure_log,
                seed,
                max_page_size,
                no_demo_data,
            })?;
        }
        Commands::HashPassword { password } => {
            commands::hash_password::run(&password)?;
        }
        Commands::IssueToken {
            secret,
            user_id,
            username,
        } => {
            commands::issue_token::run(secret, user_id, &username)?;
        }
        Commands::Version => {
            println!("PiSync CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("PiSync Core v{}", pisync_core::VERSION);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_serve_flags() {
        let cli = Cli::try_parse_from([
            "pisync",
            "serve",
            "--bind",
            "0.0.0.0:3000",
            "--success-rate",
            "0.5",
            "--no-failure-log",
            "--json-logs",
        ])
        .unwrap();

        assert!(cli.json_logs);
        match cli.command {
            Commands::Serve {
                bind,
                success_rate,
                no_failure_log,
                secret,
                ..
            } => {
                assert_eq!(bind, Some("0.0.0.0:3000".parse().unwrap()));
                assert_eq!(success_rate, Some(0.5));
                assert!(no_failure_log);
                assert!(secret.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn issue_token_requires_user() {
        assert!(Cli::try_parse_from(["pisync", "issue-token", "--username", "admin"]).is_err());
        assert!(Cli::try_parse_from([
            "pisync",
            "issue-token",
            "--user-id",
            "1",
            "--username",
            "admin"
        ])
        .is_ok());
    }
}
