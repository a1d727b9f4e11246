use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use salesheet::cli;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "salesheet")]
#[command(about = "Fill a styled spreadsheet template with product-sales rows.")]
#[command(long_about = "Salesheet - styled template rows for sales reports

Takes a template whose data row is fully formatted (fonts, borders,
protection, row height) and writes one row per product record below it,
each a formatting copy of the template row. Every sales figure gets a
percentage of previous-year sales in the column to its right.

COMMANDS:
  generate        - Fill a template and write an .xlsx report
  inspect         - Print the values of a generated .xlsx
  sample-records  - Write the built-in sample records as YAML

EXAMPLES:
  salesheet generate template.yaml report.xlsx
  salesheet generate template.yaml report.xlsx --records q1.yaml --date 2025-06-01
  salesheet inspect report.xlsx --json")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Fill a template and write an .xlsx report.

The template row (layout.data_start_row, default 6) receives the first
record; every further record gets a new row below it with the template
row's formatting. Header cells receive fiscal-year and month labels
computed from --date (default: today).

A record whose prev_year_sales is zero is rejected and nothing is written.")]
    /// Fill a template and write an .xlsx report
    Generate {
        /// Path to the template YAML file
        template: PathBuf,

        /// Output Excel file path (.xlsx)
        output: PathBuf,

        /// Records YAML file (default: built-in sample records)
        #[arg(short, long, env = "SALESHEET_RECORDS")]
        records: Option<PathBuf>,

        /// Worksheet to fill (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Reference date for header labels (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Show verbose generation steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the values of a generated .xlsx
    Inspect {
        /// Path to Excel file (.xlsx)
        input: PathBuf,

        /// Worksheet to read (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write the built-in sample records as YAML
    SampleRecords {
        /// Output YAML file path
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "salesheet=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            template,
            output,
            records,
            sheet,
            date,
            verbose,
        } => {
            let context = format!("Failed to generate {}", output.display());
            cli::generate(template, output, records, sheet, date, verbose)
                .map(|_| ())
                .context(context)
        }

        Commands::Inspect { input, sheet, json } => {
            let context = format!("Failed to inspect {}", input.display());
            cli::inspect(input, sheet, json).context(context)
        }

        Commands::SampleRecords { output } => {
            let context = format!("Failed to write {}", output.display());
            cli::sample_records(output).context(context)
        }
    }
}
