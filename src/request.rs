use crate::constants::{
    BYTES_PER_MEGABYTE, HIGH_QUALITY, LOW_QUALITY, MAX_QUALITY, MEDIUM_QUALITY, MIN_QUALITY,
};
use crate::error::{CompressionError, Result};
use crate::formats::FormatChoice;
use crate::validation::validate_image_extension;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How each file's encoder quality is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum QualityMode {
    /// The same level for every file.
    FixedQuality(u8),
    /// A size budget in megabytes for the whole batch, shared out by original size.
    TargetTotalSize(f64),
}

impl QualityMode {
    pub fn fixed(level: u8) -> Result<Self> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&level) {
            return Err(CompressionError::InvalidQuality(level));
        }
        Ok(QualityMode::FixedQuality(level))
    }

    pub fn target_megabytes(megabytes: f64) -> Result<Self> {
        if !megabytes.is_finite() || megabytes <= 0.0 {
            return Err(CompressionError::InvalidTargetSize(megabytes.to_string()));
        }
        Ok(QualityMode::TargetTotalSize(megabytes))
    }

    /// Parses user-entered text such as `"5"` or `" 2.5 "`.
    pub fn parse_target_size(input: &str) -> Result<Self> {
        let megabytes: f64 = input
            .trim()
            .parse()
            .map_err(|_| CompressionError::InvalidTargetSize(input.to_string()))?;
        Self::target_megabytes(megabytes)
            .map_err(|_| CompressionError::InvalidTargetSize(input.to_string()))
    }

    pub fn target_bytes(&self) -> Option<f64> {
        match self {
            QualityMode::FixedQuality(_) => None,
            QualityMode::TargetTotalSize(megabytes) => Some(megabytes * BYTES_PER_MEGABYTE),
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            QualityMode::FixedQuality(level) => Self::fixed(level).map(|_| ()),
            QualityMode::TargetTotalSize(megabytes) => {
                Self::target_megabytes(megabytes).map(|_| ())
            }
        }
    }
}

impl Default for QualityMode {
    fn default() -> Self {
        QualityPreset::default().into()
    }
}

/// Named quality levels offered to end users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityPreset {
    High,
    #[default]
    Medium,
    Low,
}

impl QualityPreset {
    pub fn level(&self) -> u8 {
        match self {
            QualityPreset::High => HIGH_QUALITY,
            QualityPreset::Medium => MEDIUM_QUALITY,
            QualityPreset::Low => LOW_QUALITY,
        }
    }
}

impl From<QualityPreset> for QualityMode {
    fn from(preset: QualityPreset) -> Self {
        QualityMode::FixedQuality(preset.level())
    }
}

impl FromStr for QualityPreset {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "high" => Ok(QualityPreset::High),
            "medium" => Ok(QualityPreset::Medium),
            "low" => Ok(QualityPreset::Low),
            _ => Err(CompressionError::UnsupportedFormat(format!(
                "unknown quality preset: {}",
                s
            ))),
        }
    }
}

/// An immutable snapshot of everything one batch run needs.
///
/// Deserializing goes through [`CompressionRequest::new`], so a request read
/// from JSON is validated like one built in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RequestFields")]
pub struct CompressionRequest {
    inputs: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
    quality: QualityMode,
    format: FormatChoice,
}

#[derive(Deserialize)]
struct RequestFields {
    inputs: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
    quality: QualityMode,
    format: FormatChoice,
}

impl TryFrom<RequestFields> for CompressionRequest {
    type Error = CompressionError;

    fn try_from(fields: RequestFields) -> Result<Self> {
        Self::new(
            fields.inputs,
            fields.output_dir,
            fields.quality,
            fields.format,
        )
    }
}

impl CompressionRequest {
    /// Builds a request, rejecting bad quality values and non PNG/JPEG paths.
    ///
    /// Readability is not checked here; the batch stats each file itself and
    /// aborts on the first one it cannot read.
    pub fn new(
        inputs: Vec<PathBuf>,
        output_dir: Option<PathBuf>,
        quality: QualityMode,
        format: FormatChoice,
    ) -> Result<Self> {
        quality.validate()?;
        for input in &inputs {
            validate_image_extension(input)?;
        }

        Ok(Self {
            inputs,
            output_dir,
            quality,
            format,
        })
    }

    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    pub fn quality(&self) -> QualityMode {
        self.quality
    }

    pub fn format(&self) -> FormatChoice {
        self.format
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}
