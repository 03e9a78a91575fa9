use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Keeptally, completion statistics and recurring checklists for your notes.
#[derive(Parser, Debug)]
pub struct Cli {
    /// The path to the JSON config file declaring metrics and templates.
    #[arg(short, long, default_value = "keeptally.json")]
    pub config: PathBuf,
    /// The email to authenticate with (overrides `user.email` in the config).
    #[arg(short, long)]
    pub email: Option<String>,
    /// The address of the note store (overrides `store` in the config).
    #[arg(long)]
    pub store: Option<String>,
    /// Print every point of every series; repeat for debug logs.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "snake_case")]
pub enum Command {
    /// Authenticate with the note store and save the session token in the system keyring.
    Login,
    /// Aggregate every configured metric at each of its modes, writing a CSV per series.
    Stats {
        /// Don't write any files.
        #[arg(short, long)]
        dry: bool,
        /// The directory to write CSV files into.
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Generate the todos every template produces over a range of dates.
    Plan {
        /// The first date to generate todos for (inclusive, defaults to today).
        #[arg(short, long)]
        from: Option<NaiveDate>,
        /// The last date to generate todos for (inclusive, defaults to today).
        #[arg(short, long)]
        until: Option<NaiveDate>,
        /// Create the generated todos in the note store, rather than just printing them.
        #[arg(long)]
        push: bool,
    },
}
