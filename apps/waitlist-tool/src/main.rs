//! CLI tool for inspecting and editing the wait list snapshot.
//!
//! Works on the snapshot file directly. Do not run mutating commands while a
//! server owns the same data directory.

mod cli;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use waitlist_core::config::RosterConfig;
use waitlist_core::signup::{self, Signup};
use waitlist_core::time_utils::{display_offset, quote_time_choices, spoken_duration};
use waitlist_core::{CountdownBoard, Guest, Mood, RosterStore};

use crate::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = RosterConfig {
        data_dir: cli.data_dir.clone(),
        display_utc_offset_minutes: cli.utc_offset_minutes,
        ..Default::default()
    };
    run(&config, cli.command)
}

fn run(config: &RosterConfig, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Spoken { minutes } => println!("{}", spoken_duration(minutes)),
        Commands::QuoteTimes => {
            for (minutes, label) in quote_time_choices() {
                println!("{:>4}  {}", minutes, label);
            }
        }
        Commands::Check => {
            let guests = RosterStore::open(config)
                .with_context(|| format!("{} is not usable", config.snapshot_path().display()))?
                .len();
            println!("{}: ok, {} guests", config.snapshot_path().display(), guests);
        }
        Commands::List { at } => {
            let store = open_store(config)?;
            let offset = display_offset(config.display_utc_offset_minutes);
            print_board(&store.board(at.unwrap_or_else(Utc::now), offset));
        }
        Commands::Add {
            name,
            party_size,
            quoted,
            mood,
            notes,
            arrival,
        } => {
            let store = open_store(config)?;
            let guest = Guest::new(
                name,
                party_size,
                arrival.unwrap_or_else(Utc::now),
                quoted,
                parse_mood(&mood)?,
            )
            .with_notes(notes);
            let index = store.add_guest(guest.clone())?;
            save(&store)?;
            println!("Added {} at #{}", guest.name, index + 1);
        }
        Commands::Edit {
            index,
            name,
            party_size,
            quoted,
            mood,
            notes,
        } => {
            let store = open_store(config)?;
            let original = store.guest_at(index)?;
            let mut updated = original.clone();
            if let Some(name) = name {
                updated.name = name;
            }
            if let Some(party_size) = party_size {
                updated.party_size = party_size;
            }
            if let Some(quoted) = quoted {
                updated.quoted_time = quoted;
            }
            if let Some(mood) = mood {
                updated.mood = parse_mood(&mood)?;
            }
            if let Some(notes) = notes {
                updated.notes = notes;
            }
            let new_index = store.replace_guest(&original, updated)?;
            save(&store)?;
            println!("Updated {} now at #{}", original.name, new_index + 1);
        }
        Commands::Seat { index } => {
            let store = open_store(config)?;
            let guest = store.guest_at(index)?;
            store.seat_guest(&guest)?;
            save(&store)?;
            println!("Seated {}", guest.name);
        }
        Commands::Remove { index } => {
            let store = open_store(config)?;
            let guest = store.guest_at(index)?;
            store.dismiss_guest(&guest)?;
            save(&store)?;
            println!("Removed {}", guest.name);
        }
        Commands::Signup { name, party_size } => {
            let store = open_store(config)?;
            let fields = name
                .map(|name| ("name", name))
                .into_iter()
                .chain(party_size.map(|size| ("partySize", size)));
            let (guest, index) = signup::register(&store, &Signup::from_pairs(fields), Utc::now())?;
            save(&store)?;
            println!("Signed up {} (party of {}) at #{}", guest.name, guest.party_size, index + 1);
        }
    }
    Ok(())
}

fn open_store(config: &RosterConfig) -> anyhow::Result<RosterStore> {
    RosterStore::open(config)
        .with_context(|| format!("Failed to load {}", config.snapshot_path().display()))
}

/// Fails if the write made by the last mutation did not reach disk.
fn save(store: &RosterStore) -> anyhow::Result<()> {
    match store.persist_failure()? {
        None => Ok(()),
        Some(e) => {
            tracing::warn!(
                "Change kept in memory only, {} was not updated",
                store.snapshots().path().display()
            );
            Err(e).context("Failed to save roster")
        }
    }
}

fn parse_mood(value: &str) -> anyhow::Result<Mood> {
    match Mood::parse(value) {
        Some(mood) => Ok(mood),
        None => bail!("Unknown mood '{}', expected happy, meh or unhappy", value),
    }
}

fn print_board(board: &CountdownBoard) {
    if board.rows.is_empty() {
        println!("No one is waiting");
        return;
    }
    for row in &board.rows {
        let marker = if row.overdue { "!" } else { " " };
        println!(
            "{:>3}{} {:<20} party of {:<3} arrived {}  quoted {:<18} {:<17} [{}]",
            row.number,
            marker,
            row.name,
            row.party_size,
            row.arrival,
            row.quoted,
            row.remaining,
            row.mood.as_str()
        );
        if !row.notes.is_empty() {
            println!("      {}", row.notes);
        }
    }
}
