//! `grading` — record student grading attempts into a CSV dataset.
//!
//! Every command works against one explicit store path, taken from
//! `--store` or the config file (default `grading_data.csv`).

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use grading_runtime::csv_codec;
use grading_runtime::config::{load_config, GradingConfig};
use grading_runtime::form::{status_message, TerminalForm};
use grading_runtime::grader::Grader;
use grading_runtime::logging;
use grading_runtime::record_store::RecordStore;
use grading_runtime::summary::summarize;

#[derive(Parser)]
#[command(name = "grading", version, about = "Record student grading attempts")]
struct Cli {
    /// TOML config file. Missing file means defaults.
    #[arg(long, default_value = "grading.toml")]
    config: PathBuf,

    /// CSV store path. Overrides `store_path` from the config.
    #[arg(long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fill in forms interactively until end of input.
    Form,
    /// Submit one form from flags.
    Submit {
        #[arg(long)]
        name: String,
        /// Number of attempts (1-4).
        #[arg(long)]
        attempts: String,
        /// One per attempt, in order.
        #[arg(long = "score")]
        scores: Vec<String>,
    },
    /// Print every stored row.
    Records,
    /// Print record count, class average and digest as JSON.
    Summary,
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let mut cfg: GradingConfig = load_config(&cli.config)?;
    if let Some(store) = cli.store {
        cfg.store_path = store;
    }
    cfg.validate()?;
    logging::init(&cfg.log_filter);

    let store = RecordStore::new(&cfg.store_path);
    match cli.command {
        Command::Form => cmd_form(store),
        Command::Submit {
            name,
            attempts,
            scores,
        } => cmd_submit(store, &name, &attempts, &scores),
        Command::Records => cmd_records(&store),
        Command::Summary => cmd_summary(&store),
    }
}

fn cmd_form(store: RecordStore) -> Result<i32> {
    let grader = Grader::new(store);
    let stdin = io::stdin();
    let mut form = TerminalForm::new(stdin.lock(), io::stdout());
    while form.prompt().context("read form input")? {
        // Outcome is already shown to the user by the form.
        let _ = grader.handle(&mut form);
    }
    Ok(0)
}

fn cmd_submit(store: RecordStore, name: &str, attempts: &str, scores: &[String]) -> Result<i32> {
    let grader = Grader::new(store);
    let result = grader.submit(name, attempts, scores);
    let message = status_message(&result);
    if result.is_ok() {
        println!("{}", message);
        Ok(0)
    } else {
        eprintln!("{}", message);
        Ok(1)
    }
}

fn cmd_records(store: &RecordStore) -> Result<i32> {
    let records = store.load_records()?;
    let mut out = io::stdout().lock();
    out.write_all(csv_codec::header_row().as_bytes())
        .context("write records")?;
    for record in &records {
        out.write_all(csv_codec::record_to_row(record).as_bytes())
            .context("write records")?;
    }
    Ok(0)
}

fn cmd_summary(store: &RecordStore) -> Result<i32> {
    let summary = summarize(store)?;
    let json = serde_json::to_string_pretty(&summary).context("serialize summary")?;
    println!("{}", json);
    Ok(0)
}
