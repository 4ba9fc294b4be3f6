//! Extract command - run a single scanned invoice through OCR and structuring.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use erpscan_core::models::invoice::ErrorResponse;
use erpscan_core::Upload;

use crate::output::{OutputFormat, format_response};
use crate::providers::build_pipeline;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Show stage timings
    #[arg(long)]
    show_timing: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let pipeline = build_pipeline(&config)?;
    let upload = Upload::from_path(&args.input)?;

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    pb.set_message("Running OCR and structuring...");

    let result = pipeline.run(&upload).await;
    pb.finish_and_clear();

    let response = match result {
        Ok(response) => response,
        Err(e) => anyhow::bail!("{}", ErrorResponse::from(&e).error),
    };

    let output = format_response(&response, args.format, args.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_timing {
        let timing = &response.processing_time;
        println!();
        println!("{} OCR time: {:.2}s", style("ℹ").blue(), timing.ocr_time);
        println!("{} Structure time: {:.2}s", style("ℹ").blue(), timing.structure_time);
        println!("{} Total time: {:.2}s", style("ℹ").blue(), timing.total_time);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
