use clap::{Parser, ValueEnum};
use colored::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use usedcars::config::{DEFAULT_DATA_DIR, TABLE_NAME};
use usedcars::storage::export::{export_csv, export_jsonl};
use usedcars::StorageEngine;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Csv,
    Jsonl,
}

#[derive(Parser, Debug)]
#[command(name = "usedcars-dump")]
#[command(about = "Export a stored table as CSV or JSON Lines", long_about = None)]
struct Args {
    /// Store data directory
    #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
    data_dir: String,

    /// Table to export
    #[arg(short, long, default_value = TABLE_NAME)]
    table: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Output file (if not specified, writes to stdout)
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let storage = StorageEngine::open(&args.data_dir)?;
    let table = storage.table(&args.table)?;

    let output: Box<dyn Write> = if let Some(output_file) = &args.output {
        Box::new(BufWriter::new(File::create(output_file)?))
    } else {
        Box::new(io::stdout().lock())
    };

    eprintln!("{} {}", "Dumping table:".green().bold(), args.table.cyan());
    let count = match args.format {
        Format::Csv => export_csv(&table, output)?,
        Format::Jsonl => export_jsonl(&table, output)?,
    };
    eprintln!(
        "{} {} {}",
        "Exported".green(),
        count.to_string().yellow(),
        "rows".green()
    );

    if let Some(output) = &args.output {
        eprintln!("✓ Dump written to {}", output);
    }

    drop(table);
    storage.close()?;
    Ok(())
}
