//! Parse command - turn ERP-formatted text into a structured record.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::{debug, info};

use erpscan_core::parse_erp_text;

use crate::output::{OutputFormat, format_record};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Structured text file (default: stdin)
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

pub async fn run(args: ParseArgs) -> anyhow::Result<()> {
    let text = match &args.input {
        Some(path) if path.as_os_str() != "-" => {
            info!("Parsing file: {}", path.display());
            fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?
        }
        _ => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let record = parse_erp_text(&text);
    debug!(
        "Parsed {} fields across {} items",
        record.field_count(),
        record.items.len()
    );

    let output = format_record(&record, args.format, args.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", output);
        if !output.ends_with('\n') {
            println!();
        }
    }

    Ok(())
}
