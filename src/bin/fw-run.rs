//! CLI tool to convert between fixed-width data files and JSON records.
//!
//! Usage:
//!   fw-run decode <layout.json> <input.data> [-o output.jsonl]
//!   fw-run encode <layout.json> <input.jsonl> [-o output.data]
//!   fw-run validate <layout.json> <input.jsonl>
//!
//! If no output file is specified, writes to stdout.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use fixed_width::{Layout, Record};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fw-run", about = "Convert fixed-width data using a JSON layout")]
struct Cli {
    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Fixed-width lines to JSON records, one per line
    Decode {
        layout: PathBuf,
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// JSON records, one per line, to fixed-width lines
    Encode {
        layout: PathBuf,
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Type-check JSON records, one per line, against the layout
    Validate { layout: PathBuf, input: PathBuf },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let (layout_file, input_file, output_file) = match &cli.command {
        Action::Decode {
            layout,
            input,
            output,
        }
        | Action::Encode {
            layout,
            input,
            output,
        } => (layout, input, output.as_ref()),
        Action::Validate { layout, input } => (layout, input, None),
    };

    let layout_text = read_or_exit(layout_file, "layout");
    let layout = match Layout::from_json(&layout_text) {
        Ok(layout) => layout,
        Err(e) => {
            eprintln!("Error in layout file '{}': {}", layout_file.display(), e);
            process::exit(1);
        }
    };
    debug!(
        fields = layout.fields().len(),
        length = layout.length(),
        "layout loaded"
    );

    let input_text = read_or_exit(input_file, "input");

    let result = match &cli.command {
        Action::Decode { .. } => decode_text(&layout, &input_text),
        Action::Encode { .. } => encode_text(&layout, &input_text),
        Action::Validate { .. } => validate_text(&layout, &input_text),
    };

    match result {
        Ok((output, input_count, output_count)) => {
            if let Some(out_path) = output_file {
                if let Some(parent) = out_path.parent()
                    && !parent.as_os_str().is_empty()
                    && fs::create_dir_all(parent).is_err()
                {
                    eprintln!(
                        "Error creating output directory for '{}'",
                        out_path.display()
                    );
                    process::exit(1);
                }
                if let Err(e) = fs::write(out_path, &output) {
                    eprintln!("Error writing output file '{}': {}", out_path.display(), e);
                    process::exit(1);
                }
                eprintln!(
                    "Processed {} -> {} records, output: {}",
                    input_count,
                    output_count,
                    out_path.display()
                );
            } else {
                if let Err(e) = io::stdout().write_all(output.as_bytes()) {
                    eprintln!("Error writing output: {}", e);
                    process::exit(1);
                }
                eprintln!("Processed {} -> {} records", input_count, output_count);
            }
        }
        Err(e) => {
            eprintln!("Conversion error: {}", e);
            process::exit(1);
        }
    }
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fixed_width=info,fw_run=info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(true);
    if subscriber.try_init().is_err() {
        eprintln!("Warning: logging was already initialized");
    }
}

fn read_or_exit(path: &Path, what: &str) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {} file '{}': {}", what, path.display(), e);
            process::exit(1);
        }
    }
}

/// Non-empty input lines with their 1-based line numbers.
fn numbered_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(i, line)| (i + 1, line))
}

fn parse_record(n: usize, line: &str) -> Result<Record, String> {
    serde_json::from_str(line).map_err(|e| format!("line {n}: invalid record: {e}"))
}

/// Returns (output_text, input_count, output_count).
fn decode_text(layout: &Layout, input: &str) -> Result<(String, usize, usize), String> {
    let mut output = String::new();
    let mut count = 0;
    for (n, line) in numbered_lines(input) {
        let record = layout.read_line(line).map_err(|e| format!("line {n}: {e}"))?;
        let json = serde_json::to_string(&record).map_err(|e| format!("line {n}: {e}"))?;
        output.push_str(&json);
        output.push('\n');
        count += 1;
    }
    Ok((output, count, count))
}

fn encode_text(layout: &Layout, input: &str) -> Result<(String, usize, usize), String> {
    let mut output = String::new();
    let mut count = 0;
    for (n, line) in numbered_lines(input) {
        let record = parse_record(n, line)?;
        let text = layout
            .write_line(&record)
            .map_err(|e| format!("line {n}: {e}"))?;
        output.push_str(&text);
        output.push('\n');
        count += 1;
    }
    Ok((output, count, count))
}

fn validate_text(layout: &Layout, input: &str) -> Result<(String, usize, usize), String> {
    let mut count = 0;
    for (n, line) in numbered_lines(input) {
        let record = parse_record(n, line)?;
        layout
            .validate(&record)
            .map_err(|e| format!("line {n}: {e}"))?;
        count += 1;
    }
    Ok((String::new(), count, count))
}
