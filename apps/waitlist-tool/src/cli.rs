use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Data directory holding the roster snapshot
    #[arg(long, global = true, default_value = "./data")]
    pub data_dir: PathBuf,

    /// UTC offset for displayed arrival times, in minutes
    #[arg(long, global = true, default_value_t = 0, allow_hyphen_values = true)]
    pub utc_offset_minutes: i32,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the countdown board
    List {
        /// Project at this RFC 3339 instant instead of now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },

    /// Add a guest
    Add {
        name: String,

        #[arg(short, long, default_value_t = 1)]
        party_size: u32,

        /// Quoted wait in minutes
        #[arg(short, long, default_value_t = 5)]
        quoted: u32,

        /// happy, meh, unhappy or an ordinal
        #[arg(short, long, default_value = "happy")]
        mood: String,

        #[arg(short, long, default_value = "")]
        notes: String,

        /// Arrival as RFC 3339, defaults to now
        #[arg(long)]
        arrival: Option<DateTime<Utc>>,
    },

    /// Edit the guest at a position
    Edit {
        index: usize,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        party_size: Option<u32>,

        #[arg(short, long)]
        quoted: Option<u32>,

        #[arg(short, long)]
        mood: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Seat the guest at a position
    Seat { index: usize },

    /// Remove the guest at a position without seating them
    Remove { index: usize },

    /// Register a self-signup with raw string fields
    Signup {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        party_size: Option<String>,
    },

    /// Print the spoken form of a wait
    Spoken { minutes: u32 },

    /// List the quote choices
    QuoteTimes,

    /// Validate the snapshot file
    Check,
}
