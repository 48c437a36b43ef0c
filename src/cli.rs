//! CLI argument parsing for the hockey-travel binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use hockey_travel::defaults::{DEFAULT_ARRIVAL_BUFFER_MINUTES, DEFAULT_PREP_TIME_MINUTES};

#[derive(Parser)]
#[command(name = "hockey-travel", about = "When to wake up and leave for a hockey game")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute a travel plan and print it as JSON
    Plan(PlanArgs),
    /// Resolve a timezone indicator, optionally localizing a date and time
    Zone {
        /// Abbreviation (PT, EST, ...) or IANA name
        indicator: String,
        /// Local date, YYYY-MM-DD
        #[arg(long, requires = "time")]
        date: Option<String>,
        /// Local wall-clock time
        #[arg(long, requires = "date")]
        time: Option<String>,
    },
}

#[derive(Args)]
pub struct PlanArgs {
    /// Home address
    #[arg(long)]
    pub home: String,

    /// Resolved venue address
    #[arg(long)]
    pub venue_address: String,

    /// Game JSON as produced by the schedule provider
    #[arg(long, conflicts_with_all = ["date", "time"])]
    pub game_file: Option<PathBuf>,

    /// Game date, YYYY-MM-DD
    #[arg(long, required_unless_present = "game_file")]
    pub date: Option<String>,

    /// Kickoff wall-clock time, e.g. 15:00 or "3:00 PM"
    #[arg(long, required_unless_present = "game_file")]
    pub time: Option<String>,

    /// Timezone indicator declared for the game
    #[arg(long)]
    pub zone: Option<String>,

    /// Venue name, for logging
    #[arg(long, default_value = "Rink")]
    pub venue_name: String,

    /// Minutes on site before kickoff
    #[arg(long, default_value_t = DEFAULT_ARRIVAL_BUFFER_MINUTES)]
    pub arrival_buffer: u32,

    /// Minutes between waking up and leaving
    #[arg(long, default_value_t = DEFAULT_PREP_TIME_MINUTES)]
    pub prep_time: u32,

    /// Timezone that wins over the game's own indicator
    #[arg(long)]
    pub zone_override: Option<String>,
}
