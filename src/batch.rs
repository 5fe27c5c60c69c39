use crate::constants::{MAX_SEARCH_QUALITY, OUTPUT_SUFFIX};
use crate::error::{BatchError, CompressionError, Result};
use crate::formats::OutputFormat;
use crate::processing::{load_image, prepare_for_format, save_image, sniff_format};
use crate::request::{CompressionRequest, QualityMode};
use crate::search::{search_quality, EncoderProbe};
use crate::validation::validate_input_file;
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// One processed file. Both sizes are measured from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionResult {
    pub source: PathBuf,
    pub output: PathBuf,
    pub original_size: u64,
    pub compressed_size: u64,
    pub format: OutputFormat,
    /// Quality the file was written at; `None` for PNG, which ignores it.
    pub quality: Option<u8>,
}

impl CompressionResult {
    /// Fractional size reduction, negative when the output grew.
    pub fn ratio(&self) -> Result<f64> {
        if self.original_size == 0 {
            return Err(CompressionError::EmptyFile(self.source.clone()));
        }
        Ok((self.original_size as f64 - self.compressed_size as f64) / self.original_size as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_original: u64,
    pub total_compressed: u64,
    /// Fractional reduction over the whole batch, 0 when nothing was read.
    pub ratio: f64,
    pub processed: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[CompressionResult], failed: usize) -> Self {
        let total_original: u64 = results.iter().map(|r| r.original_size).sum();
        let total_compressed: u64 = results.iter().map(|r| r.compressed_size).sum();
        let ratio = if total_original > 0 {
            (total_original as f64 - total_compressed as f64) / total_original as f64
        } else {
            0.0
        };

        Self {
            total_original,
            total_compressed,
            ratio,
            processed: results.len(),
            failed,
        }
    }

    pub fn bytes_saved(&self) -> u64 {
        self.total_original.saturating_sub(self.total_compressed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Same order as the request's inputs.
    pub results: Vec<CompressionResult>,
    pub summary: BatchSummary,
    pub elapsed: Duration,
}

/// Published once a file has been written and measured.
#[derive(Debug, Clone, Copy)]
pub struct ProgressEvent<'a> {
    /// 1-based count of files finished so far
    pub completed: usize,
    pub total: usize,
    pub result: &'a CompressionResult,
}

pub trait ProgressSink {
    fn on_file_done(&mut self, event: ProgressEvent<'_>);
}

impl ProgressSink for () {
    fn on_file_done(&mut self, _event: ProgressEvent<'_>) {}
}

impl ProgressSink for ProgressBar {
    fn on_file_done(&mut self, event: ProgressEvent<'_>) {
        self.set_position(event.completed as u64);
        if let Some(name) = event.result.source.file_name() {
            self.set_message(name.to_string_lossy().into_owned());
        }
    }
}

/// `{dir}/{stem}_compressed.{jpg|png}`, where `dir` defaults to the source's
/// own directory.
pub fn generate_output_path(
    source: &Path,
    output_dir: Option<&Path>,
    format: OutputFormat,
) -> Result<PathBuf> {
    let file_stem = source
        .file_stem()
        .ok_or_else(|| CompressionError::UnsupportedFormat("Invalid file name".to_string()))?;

    let dir = match output_dir {
        Some(dir) => dir,
        None => source.parent().unwrap_or_else(|| Path::new("")),
    };

    let output_filename = format!(
        "{}{}.{}",
        file_stem.to_string_lossy(),
        OUTPUT_SUFFIX,
        format.extension()
    );
    Ok(dir.join(output_filename))
}

/// Splits `target_bytes` across files in proportion to their original sizes.
///
/// The shares sum to `target_bytes` up to float rounding. If every size is
/// zero the target is split evenly.
pub fn allocate_targets(sizes: &[u64], target_bytes: f64) -> Vec<f64> {
    let total: u64 = sizes.iter().sum();
    if total == 0 {
        let even = target_bytes / sizes.len().max(1) as f64;
        return vec![even; sizes.len()];
    }

    sizes
        .iter()
        .map(|&size| size as f64 / total as f64 * target_bytes)
        .collect()
}

/// Runs batches one file at a time, aborting on the first failure.
#[derive(Debug, Clone, Default)]
pub struct BatchCompressor {
    cancel: Option<Arc<AtomicBool>>,
}

impl BatchCompressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checked before each file. Setting it stops the batch with
    /// `CompressionError::Cancelled`, keeping the files already done.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn compress_batch<S>(
        &self,
        request: &CompressionRequest,
        progress: &mut S,
    ) -> std::result::Result<BatchReport, BatchError>
    where
        S: ProgressSink + ?Sized,
    {
        let start_time = Instant::now();
        let total = request.len();
        let mut results: Vec<CompressionResult> = Vec::with_capacity(total);

        let abort = |completed: Vec<CompressionResult>, source: CompressionError| BatchError {
            completed,
            source,
        };

        if let Some(dir) = request.output_dir() {
            fs::create_dir_all(dir).map_err(|e| {
                abort(
                    Vec::new(),
                    CompressionError::DirectoryCreationFailed {
                        path: dir.to_path_buf(),
                        source: e,
                    },
                )
            })?;
        }

        check_output_conflicts(request).map_err(|e| abort(Vec::new(), e))?;

        let targets = match request.quality().target_bytes() {
            Some(target_bytes) => {
                let sizes = request
                    .inputs()
                    .iter()
                    .map(|path| validate_input_file(path))
                    .collect::<Result<Vec<u64>>>()
                    .map_err(|e| abort(Vec::new(), e))?;
                Some(allocate_targets(&sizes, target_bytes))
            }
            None => None,
        };

        for (index, source) in request.inputs().iter().enumerate() {
            if self.is_cancelled() {
                warn!(path = %source.display(), "batch cancelled");
                return Err(abort(
                    results,
                    CompressionError::Cancelled {
                        path: source.clone(),
                    },
                ));
            }

            let target = targets.as_ref().map(|shares| shares[index]);
            let result = match compress_file(source, request, target) {
                Ok(result) => result,
                Err(e) => return Err(abort(results, e)),
            };

            info!(
                source = %result.source.display(),
                output = %result.output.display(),
                original_size = result.original_size,
                compressed_size = result.compressed_size,
                "compressed file"
            );

            results.push(result);
            progress.on_file_done(ProgressEvent {
                completed: index + 1,
                total,
                result: &results[index],
            });
        }

        let summary = BatchSummary::from_results(&results, 0);
        Ok(BatchReport {
            results,
            summary,
            elapsed: start_time.elapsed(),
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }
}

/// Compresses a batch with no cancellation.
pub fn compress_batch<S>(
    request: &CompressionRequest,
    progress: &mut S,
) -> std::result::Result<BatchReport, BatchError>
where
    S: ProgressSink + ?Sized,
{
    BatchCompressor::new().compress_batch(request, progress)
}

/// Rejects a batch where one file's output would land on one of the inputs
/// or on an output already claimed by an earlier file. Runs before anything
/// is written. Files whose header cannot be read are left to the main loop,
/// which reports their own error in order.
fn check_output_conflicts(request: &CompressionRequest) -> Result<()> {
    let mut claimed: HashMap<PathBuf, &Path> = request
        .inputs()
        .iter()
        .map(|input| (comparable_path(input), input.as_path()))
        .collect();

    for source in request.inputs() {
        let native = match sniff_format(source) {
            Ok(native) => native,
            Err(_) => continue,
        };
        let format = request.format().resolve(native);
        let output = generate_output_path(source, request.output_dir(), format)?;

        if let Some(other) = claimed.insert(comparable_path(&output), source.as_path()) {
            return Err(CompressionError::OutputConflict {
                path: source.clone(),
                output,
                other: other.to_path_buf(),
            });
        }
    }

    Ok(())
}

/// Absolute form of `path` for equality checks, resolving the parent
/// directory when the file itself does not exist yet.
fn comparable_path(path: &Path) -> PathBuf {
    if let Ok(full) = fs::canonicalize(path) {
        return full;
    }
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return path.to_path_buf();
    };
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    fs::canonicalize(parent)
        .map(|dir| dir.join(name))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// stat -> decode -> pick format and path -> flatten -> pick quality -> write -> stat
fn compress_file(
    source: &Path,
    request: &CompressionRequest,
    target_bytes: Option<f64>,
) -> Result<CompressionResult> {
    let original_size = validate_input_file(source)?;
    let loaded = load_image(source)?;

    let format = request.format().resolve(loaded.native_format);
    let output = generate_output_path(source, request.output_dir(), format)?;
    let image = prepare_for_format(loaded.image, format);

    let quality = match (request.quality(), target_bytes) {
        _ if !format.is_lossy() => None,
        (QualityMode::FixedQuality(level), _) => Some(level),
        (QualityMode::TargetTotalSize(_), Some(target)) => {
            let mut probe = EncoderProbe::new(&image, format, source);
            let outcome = search_quality(&mut probe, target)?;
            debug!(
                path = %source.display(),
                target,
                quality = outcome.quality,
                trials = outcome.trials.len(),
                "resolved quality from target size"
            );
            Some(outcome.quality)
        }
        (QualityMode::TargetTotalSize(_), None) => Some(MAX_SEARCH_QUALITY),
    };

    debug!(
        path = %source.display(),
        output = %output.display(),
        format = %format,
        ?quality,
        "writing"
    );
    let compressed_size = save_image(
        &image,
        &output,
        format,
        quality.unwrap_or(MAX_SEARCH_QUALITY),
    )?;

    Ok(CompressionResult {
        source: source.to_path_buf(),
        output,
        original_size,
        compressed_size,
        format,
        quality,
    })
}
