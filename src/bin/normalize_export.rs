use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use health_ingest_rs::pipeline::normalize::Normalizer;
use health_ingest_rs::types::record::FlatRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
enum OutputFormat {
    Json,
    Jsonl,
    Csv,
}

#[derive(Parser)]
#[command(name = "normalize-export")]
#[command(about = "Flatten health export JSON files into health_data rows", long_about = None)]
#[command(version)]
struct Cli {
    /// Export file, or a directory of export files
    path: PathBuf,

    /// Owning user stamped on every record
    #[arg(long)]
    user: String,

    #[arg(long, default_value = "json")]
    format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long, default_value = "error")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&cli.log_level))
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut normalizer = Normalizer::new();
    let records = if cli.path.is_dir() {
        normalizer.process_directory(&cli.path, &cli.user)?
    } else {
        normalizer.process_file(&cli.path, &cli.user)?
    };

    let out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut out = BufWriter::new(out);

    match cli.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &records)?;
            writeln!(out)?;
        }
        OutputFormat::Jsonl => {
            for record in &records {
                serde_json::to_writer(&mut out, record)?;
                writeln!(out)?;
            }
        }
        OutputFormat::Csv => write_csv(&mut out, &records)?,
    }

    out.flush()?;
    tracing::info!("Wrote {} records", records.len());
    Ok(())
}

fn write_csv<W: Write>(out: W, records: &[FlatRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(FlatRecord::COLUMNS)?;
    for record in records {
        wtr.write_record(record.text_row())?;
    }
    wtr.flush()?;
    Ok(())
}
