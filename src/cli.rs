use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "order-counter", about = "Per-chat order counter bot")]
pub struct Cli {
    /// Path to config file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Answer `<chat_id>[:<reply_to>] /command` lines read from stdin
    Run,
    /// List valid product names
    Products,
    /// Count one order for a product
    Done {
        #[command(flatten)]
        chat: ChatArgs,
        /// Message id the order replies to
        #[arg(long)]
        reply_to: Option<i64>,
        /// Product name (case-insensitive, may span several words)
        #[arg(required = true, num_args = 1..)]
        product: Vec<String>,
    },
    /// Show counts per product
    Stats {
        #[command(flatten)]
        chat: ChatArgs,
    },
    /// Show total orders
    Total {
        #[command(flatten)]
        chat: ChatArgs,
    },
    /// Export and reset a chat's counts
    Clear {
        #[command(flatten)]
        chat: ChatArgs,
        /// Label printed in the export (default: configured chat title)
        #[arg(long)]
        label: Option<String>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ChatArgs {
    /// Conversation id the command applies to
    #[arg(long, allow_hyphen_values = true)]
    pub chat: String,
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}
