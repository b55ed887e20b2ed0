use std::fs::File;
use std::io::{stderr, stdout, BufReader, BufWriter, Write};
use std::process::exit;
use std::sync::Arc;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use tracing::{error, info};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use cylinder_recon::engine::{
    filter_duplicates, find_duplicate_groups, GroupingStrategy, ReconcileEngine, DEFAULT_WINDOW_MS,
};
use cylinder_recon::models::Transaction;
use cylinder_recon::storage::{MemoryRepository, TransactionRepository};

#[tokio::main]
async fn main() -> Result<()> {
    //NOTE: If this CLI grows more surface area it should move to the clap crate; for
    //      three positional arguments, manual parsing keeps the binary lean.
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: cylinder-recon [scan|filter|reconcile] [input].csv [log_level:optional] > [output].csv");
        eprintln!("Available log levels: error, warn, info, debug, trace (default: error)");
        exit(1);
    }

    let command = &args[1];
    let path = &args[2];
    let log_level = args.get(3)
        .map(|s| parse_log_level(s)).unwrap_or(LevelFilter::ERROR);

    setup_logging(log_level);

    let transactions = read_transactions(path)?;
    info!("Loaded {} transaction(s) from {path}", transactions.len());

    match command.as_str() {
        "scan" => write_scan_report(&transactions)?,
        "filter" => {
            let survivors = filter_duplicates(&transactions, DEFAULT_WINDOW_MS, GroupingStrategy::default());
            write_transactions_to_stdout(&survivors)?;
        }
        "reconcile" => reconcile(transactions).await?,
        other => {
            eprintln!("Unknown command '{other}', expected scan, filter or reconcile");
            exit(1);
        }
    }

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries the result CSV, so all logging goes to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

/// Reads the transaction CSV, skipping rows that fail to deserialize.
fn read_transactions(path: &str) -> Result<Vec<Transaction>> {
    let file = File::open(path).with_context(|| format!("Failed to open CSV at path: {path}"))?;

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(BufReader::new(file));

    let mut transactions = Vec::new();

    for result in reader.deserialize::<Transaction>() {
        match result {
            Ok(transaction) => transactions.push(transaction),
            Err(err) => error!("CSV deserialization error: {err}"),
        }
    }

    Ok(transactions)
}

/// Seeds the in-memory repository from the input, runs the destructive
/// cleanup, and emits every surviving document.
async fn reconcile(transactions: Vec<Transaction>) -> Result<()> {
    let repository = Arc::new(MemoryRepository::new());

    for transaction in transactions {
        repository.insert(transaction).await;
    }

    let engine = ReconcileEngine::new(repository.clone());
    let report = engine.reconcile().await?;

    info!("{}", report.message);

    let survivors = repository.list_all().await?;
    write_transactions_to_stdout(&survivors)?;

    Ok(())
}

/// One row per duplicate-group member, canonical member marked `keep`.
fn write_scan_report(transactions: &[Transaction]) -> Result<()> {
    let groups = find_duplicate_groups(transactions, DEFAULT_WINDOW_MS, GroupingStrategy::default());
    let mut output = BufWriter::new(stdout().lock());

    writeln!(output, "group,id,date,gasType,kgs,paymentMethod,kind,action")?;

    for (index, group) in groups.iter().enumerate() {
        let keep = group.canonical().id.clone();

        for member in group.members() {
            let action = if member.id == keep { "keep" } else { "remove" };
            writeln!(
                output,
                "{},{},{},{},{},{},{},{}",
                index + 1,
                member.id,
                member.date.to_rfc3339(),
                member.gas_type,
                member.kgs,
                member.payment_method,
                member.kind_label(),
                action
            )?;
        }
    }

    output.flush()?;

    Ok(())
}

fn write_transactions_to_stdout(transactions: &[Transaction]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(BufWriter::new(stdout().lock()));

    for transaction in transactions {
        writer.serialize(transaction)?;
    }

    writer.flush()?;

    Ok(())
}
