use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use quickpress::cli::{parse_format, Args, Commands};
use quickpress::constants::{ERROR_PREFIX, PROGRESS_BAR_TEMPLATE, WARNING_PREFIX};
use quickpress::formats::FormatChoice;
use quickpress::processing::{load_image, prepare_for_format};
use quickpress::search::{search_quality, EncoderProbe};
use quickpress::utils::{format_file_size, print_batch_report, print_file_result};
use quickpress::validation::{is_image_file, partition_inputs};
use quickpress::{logger, BatchCompressor, CompressionError, CompressionRequest, QualityMode};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.quiet, args.verbose);

    match args.command {
        Commands::Compress {
            inputs,
            output_dir,
            quality,
            format,
            recursive,
            json,
        } => {
            let mode = quality.to_mode()?;
            let format = parse_format(&format)?;
            run_compress(&inputs, output_dir, mode, format, recursive, json, args.quiet)?;
        }
        Commands::Probe {
            input,
            target_size,
            format,
        } => {
            run_probe(&input, &target_size, &format)?;
        }
    }

    Ok(())
}

fn run_compress(
    inputs: &[String],
    output_dir: Option<PathBuf>,
    mode: QualityMode,
    format: FormatChoice,
    recursive: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let (files, rejected) = partition_inputs(inputs, recursive)?;
    for path in &rejected {
        // A named image that is not there stops the run before anything is written.
        if is_image_file(path) {
            return Err(CompressionError::FileNotFound(path.clone()).into());
        }
        eprintln!(
            "{}  Skipping unsupported input: {}",
            WARNING_PREFIX,
            path.display()
        );
    }

    if files.is_empty() {
        if !quiet {
            println!("{}  No image files found in the input paths", WARNING_PREFIX);
        }
        return Ok(());
    }

    let request = CompressionRequest::new(files, output_dir, mode, format)?;
    let text = !json && !quiet;

    if text {
        println!("🚀 Compressing {} image(s)...", request.len());
    }

    let mut progress = if text {
        let pb = ProgressBar::new(request.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(PROGRESS_BAR_TEMPLATE)
                .context("invalid progress bar template")?,
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let outcome = BatchCompressor::new().compress_batch(&request, &mut progress);
    progress.finish_and_clear();

    match outcome {
        Ok(report) => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("serializing batch report")?
                );
            } else if text {
                for result in &report.results {
                    print_file_result(result);
                }
                print_batch_report(&report);
            }
            Ok(())
        }
        Err(err) => {
            if text {
                for result in &err.completed {
                    print_file_result(result);
                }
            }
            eprintln!(
                "{} {} of {} file(s) done before the batch stopped",
                ERROR_PREFIX,
                err.completed.len(),
                request.len()
            );
            Err(err.into())
        }
    }
}

fn run_probe(input: &Path, target_size: &str, format: &str) -> Result<()> {
    let target = QualityMode::parse_target_size(target_size)?
        .target_bytes()
        .context("target size did not resolve to bytes")?;
    let format = match parse_format(format)? {
        FormatChoice::ConvertTo(format) => format,
        FormatChoice::KeepOriginal => {
            anyhow::bail!("probe needs an explicit encoder: jpeg or png")
        }
    };

    let loaded = load_image(input)?;
    let image = prepare_for_format(loaded.image, format);
    let mut probe = EncoderProbe::new(&image, format, input);
    let outcome = search_quality(&mut probe, target)?;

    println!(
        "🔍 Quality search for {:?} ({} target)",
        input,
        format_file_size(target as u64)
    );
    for trial in &outcome.trials {
        let marker = if trial.quality == outcome.quality {
            "👉"
        } else {
            "  "
        };
        println!(
            "  {} q{:>2}: {}",
            marker,
            trial.quality,
            format_file_size(trial.size)
        );
    }
    println!(
        "✅ Best quality: {} ({})",
        outcome.quality,
        format_file_size(outcome.size)
    );

    Ok(())
}
