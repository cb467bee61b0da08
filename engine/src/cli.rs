//! CLI interface for Chambers
//!
//! This module provides the command-line interface using clap's derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Digital Chambers orchestration router
///
/// Routes chat messages to specialist agents (case law, memos, file
/// conversion) or answers them with the configured language model.
#[derive(Parser, Debug)]
#[command(name = "chambers")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the Telegram webhook server
    Serve {
        /// Address to bind (overrides telegram.bind)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Handle one message locally and print the reply
    Ask {
        /// Message text, e.g. "/memo quarterly budget"
        text: String,

        /// Conversation id used for memory
        #[arg(short, long, default_value = "cli")]
        conversation: String,
    },

    /// Show how a message would be routed
    Route {
        /// Message text
        text: String,
    },

    /// Show the stored history of a conversation
    History {
        /// Conversation id
        conversation: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the configuration file location
    Path,

    /// Print the effective configuration with secrets masked
    Show,
}
