//! Command-line arguments.
//!
//! Every global option can also come from the environment, so a shell
//! session can point all commands at one database and log directory.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

/// Shared to-do lists backed by a local SQLite file
#[derive(Parser, Debug)]
#[command(name = "superlists")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// SQLite database file
    #[arg(
        long,
        global = true,
        env = "SUPERLISTS_DB",
        default_value = "superlists.sqlite3"
    )]
    pub db: PathBuf,

    /// Log level: trace|debug|info|warn|error (default depends on build mode)
    #[arg(long, global = true, env = "SUPERLISTS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "SUPERLISTS_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Act as the registered user with this email (anonymous when unset)
    #[arg(long = "as", global = true, value_name = "EMAIL")]
    pub as_user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Register a user so lists can be owned by or shared with them
    AddUser { email: String },

    /// Start a new list with its first item
    NewList { text: String },

    /// Append an item to an existing list
    AddItem { list_id: Uuid, text: String },

    /// Share a list with another registered user
    Share { list_id: Uuid, email: String },

    /// Show lists owned by or shared with a user
    MyLists { email: String },

    /// Show one list with numbered items
    Show { list_id: Uuid },

    /// Send a login email
    SendLogin { email: String },
}
