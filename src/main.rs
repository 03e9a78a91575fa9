mod cli;
mod config;
mod error;
mod plan;
mod report;
mod stats;
mod store;

use crate::config::Config;
use crate::error::StatsError;
use crate::report::{describe_point, describe_total, series_path, write_series_file};
use crate::store::{NoteSource, NoteStore};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use cli::{Cli, Command};
use dialoguer::Password;
use log::info;
use std::path::Path;

/// Where the note store is assumed to be if neither the CLI nor the config say otherwise.
const DEFAULT_STORE: &str = "localhost:3000";

fn main() -> Result<()> {
    let args = Cli::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = Config::load(&args.config)?;
    let email = args.email.or(config.email.take());
    let store_addr = args
        .store
        .or(config.store.take())
        .unwrap_or_else(|| DEFAULT_STORE.to_string());
    let require_email = || {
        email.as_deref().with_context(|| {
            "no email given, set `user.email` in the config or pass `--email`"
        })
    };

    match args.command {
        Command::Login => {
            let email = require_email()?;
            let password = prompt_password()?;
            println!("Authenticating, this may take a while...");
            let token = NoteStore::login(&store_addr, email, &password)?;
            store::save_token(email, &token)?;
            println!("Token saved. Have fun with other commands!");
        }
        Command::Stats { dry, out_dir } => {
            let store = NoteStore::resume(&store_addr, require_email()?)?;
            run_stats(&mut config, &store, (!dry).then_some(out_dir.as_path()), args.verbose > 0)?;
        }
        Command::Plan { from, until, push } => {
            let today = Local::now().date_naive();
            let from = from.unwrap_or(today);
            let until = until.unwrap_or(today);
            if until < from {
                return Err(StatsError::InvertedRange { from, until }.into());
            }
            let store = if push {
                Some(NoteStore::resume(&store_addr, require_email()?)?)
            } else {
                None
            };
            run_plan(&config, store.as_ref(), from, until)?;
        }
    }

    Ok(())
}

/// Loads every metric from the given source and reports on it at each of its modes. If an output
/// directory is given, each series is also written there as a CSV.
fn run_stats(
    config: &mut Config,
    source: &impl NoteSource,
    out_dir: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    println!("Collecting metrics");
    let started = Local::now().naive_local();

    println!("--------------------------------");
    for metric in &mut config.metrics {
        let added = metric
            .load(source)
            .with_context(|| format!("failed to load notes for metric `{}`", metric.name()))?;
        info!(
            "loaded {added} new points for metric `{}`, {} in total",
            metric.name(),
            metric.data().len()
        );
        metric.sort();

        println!("{}", describe_total(metric.keyword(), &metric.total()));
        for &mode in metric.modes() {
            let series = metric.series(mode);
            if let Some(out_dir) = out_dir {
                let path = series_path(out_dir, metric.keyword(), mode, started);
                write_series_file(&path, &series)?;
            }

            if verbose {
                println!("Statistics in \"{mode}\" mode");
                for point in &series {
                    println!("{}", describe_point(point));
                }
                println!("----");
            }
        }
        println!("--------------------------------");
    }

    Ok(())
}

/// Generates the todos for every template between the given dates, printing them, and creating
/// them in the store if one is given.
fn run_plan(
    config: &Config,
    store: Option<&NoteStore>,
    from: NaiveDate,
    until: NaiveDate,
) -> Result<()> {
    println!("Planning todos from {from} until {until}");
    let labels = match store {
        Some(store) => store.labels()?,
        None => Vec::new(),
    };

    for template in &config.templates {
        println!("Template {} ({})", template.name(), template.mode());
        let todos = template.generate(from, until);
        for todo in &todos {
            println!(
                "{} [{}] [{}]",
                todo.title,
                todo.items.join(", "),
                todo.labels.join(", ")
            );
            if let Some(store) = store {
                store
                    .create(&todo.to_new_note(&labels))
                    .with_context(|| format!("failed to create todo from `{}`", template.name()))?;
            }
        }
        info!("generated {} todos from `{}`", todos.len(), template.name());
    }

    Ok(())
}

/// Asks for the password without echoing it.
fn prompt_password() -> Result<String> {
    Password::new()
        .with_prompt("Password")
        .interact()
        .with_context(|| "failed to read password")
}
