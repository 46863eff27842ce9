//! CLI collaborator for the HikeSense core.
//!
//! # Responsibility
//! - Wire environment config, logging, SQLite storage and the response store.
//! - Offer a small command surface for local smoke checks.

use clap::{Parser, Subcommand};
use hikesense_core::{
    core_version, distribution_shares, init_logging, CancelToken, CoreConfig, Response,
    ResponseStore, Scorer, Sentiment, SqliteResponseStorage,
};
use log::info;
use std::error::Error;
use std::process::ExitCode;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "hikesense", version, about = "Record and summarize hiking opinions")]
struct Cli {
    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List responses, newest first.
    List {
        /// Only show one sentiment (positive|moderate|negative).
        #[arg(long, value_parser = parse_sentiment)]
        sentiment: Option<Sentiment>,
    },
    /// Score and store a new opinion.
    Add { text: String },
    /// Replace the text of an existing opinion and re-score it.
    Edit { id: Uuid, text: String },
    /// Delete an opinion. Unknown ids are ignored.
    Delete { id: Uuid },
    /// Show totals, average score and sentiment distribution.
    Summary,
    /// Print the core version.
    Version,
}

fn parse_sentiment(value: &str) -> Result<Sentiment, String> {
    Sentiment::parse(value).ok_or_else(|| format!("unknown sentiment `{value}`"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Command::Version = cli.command {
        println!("hikesense_core version={}", core_version());
        return Ok(());
    }

    let config = CoreConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    info!(
        "event=cli_start module=cli status=ok command={}",
        command_name(&cli.command)
    );
    let storage = SqliteResponseStorage::open(&config.db_path)?;
    let store = ResponseStore::new(storage, Scorer::default(), config.store.clone());
    store.load_all().await?;
    let cancel = CancelToken::new();

    match cli.command {
        Command::List { sentiment } => {
            let responses = store.filtered(sentiment);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&responses)?);
            } else {
                responses.iter().for_each(print_response);
            }
        }
        Command::Add { text } => {
            let response = store.add(&text, &cancel).await?;
            emit(&response, cli.json)?;
        }
        Command::Edit { id, text } => {
            let response = store.edit(id, &text, &cancel).await?;
            emit(&response, cli.json)?;
        }
        Command::Delete { id } => {
            store.delete(id).await?;
            if !cli.json {
                println!("deleted {id}");
            }
        }
        Command::Summary => {
            let summary = store.summary();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("total={}", summary.total);
                println!("average_score={:.2}", summary.average_score);
                let shares = distribution_shares(&store.snapshot());
                for ((sentiment, count), (_, share)) in summary.distribution.iter().zip(shares) {
                    println!("{:<9} {count:>4} {:>5.1}%", sentiment.as_str(), share * 100.0);
                }
            }
        }
        Command::Version => {}
    }

    Ok(())
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::List { .. } => "list",
        Command::Add { .. } => "add",
        Command::Edit { .. } => "edit",
        Command::Delete { .. } => "delete",
        Command::Summary => "summary",
        Command::Version => "version",
    }
}

fn emit(response: &Response, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
    } else {
        print_response(response);
    }
    Ok(())
}

fn print_response(response: &Response) {
    println!(
        "{}  {:<9} score={:+.2} confidence={:.2} ({})  {}",
        response.id,
        response.sentiment().as_str(),
        response.score,
        response.confidence,
        response.confidence_level().as_str(),
        response.text
    );
}
