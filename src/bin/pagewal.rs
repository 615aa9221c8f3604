//! pagewal CLI
//!
//! Append to, dump, and verify page-based WAL files.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pagewal::{WalConfig, WalReader, WalWriter};
use tracing_subscriber::{fmt, EnvFilter};

/// pagewal CLI
#[derive(Parser, Debug)]
#[command(name = "pagewal")]
#[command(about = "Inspect and append to page-based write-ahead logs")]
#[command(version)]
struct Args {
    /// Page size in bytes (must match the writer's)
    #[arg(short, long, default_value = "32768")]
    page_size: usize,

    /// Maximum record payload in bytes (must match the writer's)
    #[arg(short, long, default_value = "4096")]
    max_record: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Append records to a log, creating it if needed
    Append {
        /// Log file
        file: PathBuf,

        /// Skip fsync on flush
        #[arg(long)]
        no_sync: bool,

        /// Records to append, one per argument
        records: Vec<String>,
    },

    /// Print every record in a log
    Dump {
        /// Log file
        file: PathBuf,
    },

    /// Check every record checksum in a log
    Verify {
        /// Log file
        file: PathBuf,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pagewal=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> pagewal::Result<()> {
    let mut config = WalConfig::builder()
        .page_size(args.page_size)
        .max_record_size(args.max_record)
        .build();

    match args.command {
        Commands::Append {
            file,
            no_sync,
            records,
        } => {
            config.sync_on_flush = !no_sync;
            let mut writer = WalWriter::open(&file, &config)?;
            for record in &records {
                writer.add_record(record.as_bytes())?;
            }
            let stats = writer.stats();
            writer.close()?;
            tracing::info!("Appended {} record(s) to {}", stats.records_appended, file.display());
        }
        Commands::Dump { file } => {
            let reader = WalReader::open(&file, &config)?;
            for (i, record) in reader.records().enumerate() {
                let record = record?;
                println!("{}\t{}", i, String::from_utf8_lossy(&record));
            }
        }
        Commands::Verify { file } => {
            let report = pagewal::verify(&file, &config)?;
            println!("pages:   {}", report.pages);
            println!("records: {}", report.records);
            if let Some(reason) = &report.corruption {
                println!("corrupt: {}", reason);
            }
            if report.truncated_tail {
                println!("tail:    truncated");
            }
            if !report.is_clean() {
                std::process::exit(2);
            }
        }
    }

    Ok(())
}
