//! Reformat CLI - flatten expression datasets
//!
//! ```bash
//! reformat run many_example.csv test_many.tsv   # Write the flat table
//! reformat preview many_example.csv --limit 5   # Print derived rows as JSON
//! ```
//!
//! `REFORMAT_INPUT` / `REFORMAT_OUTPUT` (also read from `.env`) stand in for
//! the positional paths.

use clap::{Parser, Subcommand};
use expression_reformat::logs::{init_logger, log_error, log_info};
use expression_reformat::{parse_file, reformat_file, QuoteStrip, ReformatOptions};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "reformat")]
#[command(about = "Split composite probe/sample identifiers into a flat expression table", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reformat a dataset into the five-column layout
    Run {
        /// Input CSV file
        #[arg(env = "REFORMAT_INPUT")]
        input: PathBuf,

        /// Output file (overwritten)
        #[arg(env = "REFORMAT_OUTPUT")]
        output: PathBuf,

        #[command(flatten)]
        read: ReadArgs,
    },

    /// Print the derived rows of a dataset as JSON
    Preview {
        /// Input CSV file
        #[arg(env = "REFORMAT_INPUT")]
        input: PathBuf,

        /// Maximum number of data rows to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        read: ReadArgs,
    },
}

#[derive(clap::Args)]
struct ReadArgs {
    /// Strip one character from each end of every field, quote or not
    #[arg(long)]
    positional_strip: bool,

    /// Input encoding (auto-detect if not specified)
    #[arg(short, long)]
    encoding: Option<String>,
}

impl ReadArgs {
    fn apply(self, mut options: ReformatOptions) -> ReformatOptions {
        if self.positional_strip {
            options = options.with_quote_strip(QuoteStrip::Positional);
        }
        if let Some(encoding) = self.encoding {
            options = options.with_encoding(encoding);
        }
        options
    }
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();
    init_logger();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            input,
            output,
            read,
        } => cmd_run(read.apply(ReformatOptions::new(input, output))),

        Commands::Preview {
            input,
            limit,
            output,
            read,
        } => cmd_preview(&input, limit, output.as_deref(), read),
    };

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn cmd_run(options: ReformatOptions) -> Result<(), Box<dyn std::error::Error>> {
    let summary = reformat_file(&options)?;
    log_info(format!(
        "✨ Done: {} rows read, {} rows written",
        summary.rows_read, summary.rows_written
    ));
    Ok(())
}

fn cmd_preview(
    input: &Path,
    limit: Option<usize>,
    output: Option<&Path>,
    read: ReadArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = read.apply(ReformatOptions {
        input: input.to_path_buf(),
        ..Default::default()
    });

    let rows = parse_file(input, &options, limit)?;
    log_info(format!("Derived {} rows from {}", rows.len(), input.display()));

    let json = serde_json::to_string_pretty(&rows)?;
    write_output(&json, output)
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            log_info(format!("💾 Output written to: {}", p.display()));
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
