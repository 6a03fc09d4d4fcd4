//! Command-line interface definition for Companion
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, session management, and
//! model inspection.

use clap::{Parser, Subcommand};

/// Companion - local chat CLI for Ollama
///
/// Chat with a locally hosted model and keep conversations organized
/// into named, persisted sessions.
#[derive(Parser, Debug, Clone)]
#[command(name = "companion")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the chat session file path
    #[arg(long)]
    pub chat_file: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Companion
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Override the default model from config
        #[arg(short, long)]
        model: Option<String>,

        /// Override the backend host from config
        #[arg(long)]
        host: Option<String>,
    },

    /// Manage persisted chat sessions
    Sessions {
        /// Session management subcommand
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Inspect the configured model set
    Models {
        /// Model subcommand
        #[command(subcommand)]
        command: ModelCommand,
    },
}

/// Session management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List persisted chat sessions
    List,

    /// Delete a chat session by id (or unique id prefix)
    Delete {
        /// Session id or unique prefix
        id: String,
    },
}

/// Model subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ModelCommand {
    /// List configured models and their generation parameters
    List,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            chat_file: None,
            command: Commands::Chat {
                model: None,
                host: None,
            },
        }
    }
}
