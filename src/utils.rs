//! Helpers for the text report printed by the command-line tool.

use crate::batch::{BatchReport, CompressionResult};
use crate::constants::{
    COMPRESSED_SIZE_PREFIX, COMPRESSION_RATIO_PREFIX, ORIGINAL_SIZE_PREFIX, SUCCESS_PREFIX,
    WARNING_PREFIX,
};

/// Format file size in human-readable format
///
/// # Arguments
/// * `bytes` - Size in bytes
///
/// # Returns
/// * Human-readable size string (e.g., "1.2 MB", "512 B")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Fractional ratio as a percentage string, e.g. `0.254` -> `"25.4%"`.
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

pub fn print_file_result(result: &CompressionResult) {
    let ratio = result
        .ratio()
        .map(format_ratio)
        .unwrap_or_else(|_| "n/a".to_string());
    let quality = result
        .quality
        .map(|q| format!("q{}", q))
        .unwrap_or_else(|| "lossless".to_string());

    println!(
        "  {} {} -> {} ({}, {}): {} -> {} ({})",
        SUCCESS_PREFIX,
        result.source.display(),
        result.output.display(),
        result.format,
        quality,
        format_file_size(result.original_size),
        format_file_size(result.compressed_size),
        ratio
    );
}

pub fn print_batch_report(report: &BatchReport) {
    let summary = &report.summary;

    println!("\n📊 Batch Compression Summary:");
    println!("  📁 Total files processed: {}", summary.processed);
    println!(
        "  {} {} ({} bytes)",
        ORIGINAL_SIZE_PREFIX,
        format_file_size(summary.total_original),
        summary.total_original
    );
    println!(
        "  {} {} ({} bytes)",
        COMPRESSED_SIZE_PREFIX,
        format_file_size(summary.total_compressed),
        summary.total_compressed
    );
    println!(
        "  {} {}",
        COMPRESSION_RATIO_PREFIX,
        format_ratio(summary.ratio)
    );

    if summary.ratio >= 0.0 {
        println!(
            "  {} Total space saved: {}",
            SUCCESS_PREFIX,
            format_file_size(summary.bytes_saved())
        );
    } else {
        println!(
            "  {}  Output grew by {}",
            WARNING_PREFIX,
            format_file_size(summary.total_compressed - summary.total_original)
        );
    }

    let secs = report.elapsed.as_secs_f64();
    println!("  ⏱️  Total time: {:?}", report.elapsed);
    if secs > 0.0 {
        println!(
            "  ⚡ Average speed: {:.2} files/second",
            summary.processed as f64 / secs
        );
    }
}
