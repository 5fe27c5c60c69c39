use crate::batch::{BatchSummary, CompressionResult};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image processing error on {path}: {source}")]
    ImageProcessing {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("PNG optimization error on {path}: {message}")]
    PngOptimization { path: PathBuf, message: String },

    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(u8),

    #[error("Invalid target size: {0:?}. Must be a positive number of megabytes")]
    InvalidTargetSize(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Empty file, compression ratio is undefined: {0}")]
    EmptyFile(PathBuf),

    #[error("Failed to create output directory {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No image files found in input path: {0}")]
    NoImageFilesFound(String),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),

    #[error("Batch cancelled before {path}")]
    Cancelled { path: PathBuf },

    #[error("Output {output} for {path} would overwrite {other}")]
    OutputConflict {
        path: PathBuf,
        output: PathBuf,
        other: PathBuf,
    },
}

impl CompressionError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::ImageProcessing {
            path: path.into(),
            source,
        }
    }

    /// The file this error concerns, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. }
            | Self::ImageProcessing { path, .. }
            | Self::PngOptimization { path, .. }
            | Self::DirectoryCreationFailed { path, .. }
            | Self::Cancelled { path }
            | Self::OutputConflict { path, .. } => Some(path),
            Self::FileNotFound(path) | Self::EmptyFile(path) => Some(path),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CompressionError>;

/// A batch aborted on its first failing file.
///
/// Results for the files before the failure are kept; files after it were
/// never touched.
#[derive(Debug, Error)]
#[error("Batch aborted: {source}")]
pub struct BatchError {
    pub completed: Vec<CompressionResult>,
    #[source]
    pub source: CompressionError,
}

impl BatchError {
    pub fn failed_path(&self) -> Option<&Path> {
        self.source.path()
    }

    /// Totals over the completed files, counting the aborting file as failed.
    pub fn summary(&self) -> BatchSummary {
        BatchSummary::from_results(&self.completed, 1)
    }
}
