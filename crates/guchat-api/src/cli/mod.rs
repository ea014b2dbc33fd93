//! CLI command definitions for the `guchat` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use guchat_types::config::StorageBackend;

/// Talk to Fang Yuan from the terminal, or serve the chat API.
#[derive(Parser)]
#[command(name = "guchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, env = "GUCHAT_LOG_JSON")]
    pub log_json: bool,

    /// Message store: "memory" or "sqlite" (overrides config.toml).
    #[arg(long, global = true, env = "GUCHAT_STORAGE")]
    pub storage: Option<StorageBackend>,

    /// SQLite URL (overrides config.toml).
    #[arg(long, global = true, env = "GUCHAT_DATABASE_URL")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "5000", env = "GUCHAT_PORT")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1", env = "GUCHAT_HOST")]
        host: String,
    },

    /// Send one message and print the reply.
    Send {
        /// Session the message belongs to.
        session_id: String,

        /// Message text.
        message: String,
    },

    /// Show a session's history.
    History {
        /// Session to show.
        session_id: String,
    },

    /// Delete a session's history.
    Clear {
        /// Session to clear.
        session_id: String,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        force: bool,
    },

    /// Export a session as a plain-text transcript.
    Export {
        /// Session to export.
        session_id: String,

        /// Write to this file (a directory gets the suggested filename);
        /// prints to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["guchat", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { port, host } => {
                // Env fallbacks may be set on a dev machine; only check shape.
                assert!(port > 0);
                assert!(!host.is_empty());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_global_storage_flag() {
        let cli =
            Cli::try_parse_from(["guchat", "history", "s1", "--storage", "sqlite", "--json"])
                .unwrap();
        assert_eq!(cli.storage, Some(StorageBackend::Sqlite));
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::History { session_id } if session_id == "s1"));
    }

    #[test]
    fn test_parse_rejects_unknown_storage() {
        assert!(Cli::try_parse_from(["guchat", "--storage", "redis", "history", "s1"]).is_err());
    }

    #[test]
    fn test_parse_verbosity() {
        let cli = Cli::try_parse_from(["guchat", "-vv", "send", "s1", "Hi"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Send { session_id, message } if session_id == "s1" && message == "Hi"
        ));
    }

    #[test]
    fn test_parse_clear_force() {
        let cli = Cli::try_parse_from(["guchat", "clear", "s1", "--force"]).unwrap();
        assert!(matches!(cli.command, Commands::Clear { force: true, .. }));
    }
}
