//! Batch processing command for multiple scanned invoices.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use erpscan_core::models::invoice::{ErrorResponse, ExtractionResponse};
use erpscan_core::Upload;

use crate::output::{OutputFormat, format_response};
use crate::providers::{RemotePipeline, build_pipeline};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    response: Option<ExtractionResponse>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let files = expand_inputs(&args.input, &config.upload.allowed_extensions)?;

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pipeline = build_pipeline(&config)?;

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    // Remote calls are sequential; one invoice at a time.
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        match process_single_file(&path, &pipeline).await {
            Ok(response) => {
                results.push(ProcessResult {
                    path,
                    response: Some(response),
                    error: None,
                });
            }
            Err(error_msg) => record_failure(&mut results, path, error_msg, args.continue_on_error)?,
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.response.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    for result in &successful {
        if let (Some(response), Some(output_dir)) = (&result.response, &args.output_dir) {
            let output_name = result.path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("invoice");

            let output_path = output_dir.join(format!("{}.{}", output_name, args.format.extension()));
            fs::write(&output_path, format_response(response, args.format, true)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args.output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Expand a glob pattern, keeping only files with an accepted extension.
fn expand_inputs(pattern: &str, allowed_extensions: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = glob(pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(ext))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Keep a failed file in the results, or abort the batch with its message.
///
/// The message already carries its `Processing failed:` prefix.
fn record_failure(
    results: &mut Vec<ProcessResult>,
    path: PathBuf,
    error_msg: String,
    continue_on_error: bool,
) -> anyhow::Result<()> {
    if !continue_on_error {
        error!("Failed to process {}: {}", path.display(), error_msg);
        anyhow::bail!("{}", error_msg);
    }

    warn!("Failed to process {}: {}", path.display(), error_msg);
    results.push(ProcessResult {
        path,
        response: None,
        error: Some(error_msg),
    });
    Ok(())
}

async fn process_single_file(path: &Path, pipeline: &RemotePipeline) -> Result<ExtractionResponse, String> {
    let upload = Upload::from_path(path).map_err(|e| e.to_string())?;
    pipeline
        .run(&upload)
        .await
        .map_err(|e| ErrorResponse::from(&e).error)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "header_fields",
        "items",
        "additional_fields",
        "ocr_time",
        "structure_time",
        "total_time",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(response) = &result.response {
            let data = &response.data;
            let timing = &response.processing_time;
            wtr.write_record([
                filename,
                "success",
                &data.header_fields.len().to_string(),
                &data.items.len().to_string(),
                &data.additional_fields.len().to_string(),
                &format!("{:.2}", timing.ocr_time),
                &format!("{:.2}", timing.structure_time),
                &format!("{:.2}", timing.total_time),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
