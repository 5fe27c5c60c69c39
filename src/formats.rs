//! Output format handling.
//!
//! Only JPEG and PNG are written. `FormatChoice` is what a caller asks for,
//! `OutputFormat` is what a single file resolves to once its native format
//! is known.

use crate::error::{CompressionError, Result};
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A concrete encoder for one output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Lossy, honours the quality level
    Jpeg,
    /// Lossless, quality is ignored
    Png,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }

    /// Whether the encoder uses the quality level at all.
    pub fn is_lossy(&self) -> bool {
        matches!(self, OutputFormat::Jpeg)
    }

    /// Maps a decoder-reported format to the encoder used when keeping it.
    /// Anything that is not PNG, including an unknown format, is written as JPEG.
    pub fn from_native(native: Option<ImageFormat>) -> Self {
        match native {
            Some(ImageFormat::Png) => OutputFormat::Png,
            _ => OutputFormat::Jpeg,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for OutputFormat {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            _ => Err(CompressionError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// The output format requested for a whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FormatChoice {
    #[default]
    KeepOriginal,
    ConvertTo(OutputFormat),
}

impl FormatChoice {
    pub fn resolve(&self, native: Option<ImageFormat>) -> OutputFormat {
        match self {
            FormatChoice::KeepOriginal => OutputFormat::from_native(native),
            FormatChoice::ConvertTo(format) => *format,
        }
    }
}

impl FromStr for FormatChoice {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "keep" | "same" | "original" => Ok(FormatChoice::KeepOriginal),
            other => OutputFormat::from_str(other).map(FormatChoice::ConvertTo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("jpeg").unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_str("JPG").unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_str("png").unwrap(), OutputFormat::Png);

        assert!(matches!(
            OutputFormat::from_str("webp"),
            Err(CompressionError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_output_format_extension() {
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Png.extension(), "png");
    }

    #[test]
    fn test_keep_original_uses_native_format() {
        let keep = FormatChoice::KeepOriginal;
        assert_eq!(keep.resolve(Some(ImageFormat::Png)), OutputFormat::Png);
        assert_eq!(keep.resolve(Some(ImageFormat::Jpeg)), OutputFormat::Jpeg);
    }

    #[test]
    fn test_keep_original_falls_back_to_jpeg() {
        let keep = FormatChoice::KeepOriginal;
        assert_eq!(keep.resolve(None), OutputFormat::Jpeg);
        assert_eq!(keep.resolve(Some(ImageFormat::Gif)), OutputFormat::Jpeg);
    }

    #[test]
    fn test_convert_overrides_native_format() {
        let to_png = FormatChoice::ConvertTo(OutputFormat::Png);
        assert_eq!(to_png.resolve(Some(ImageFormat::Jpeg)), OutputFormat::Png);
    }

    #[test]
    fn test_format_choice_from_str() {
        assert_eq!(
            FormatChoice::from_str("keep").unwrap(),
            FormatChoice::KeepOriginal
        );
        assert_eq!(
            FormatChoice::from_str("jpeg").unwrap(),
            FormatChoice::ConvertTo(OutputFormat::Jpeg)
        );
        assert!(FormatChoice::from_str("tiff").is_err());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(format!("{}", OutputFormat::Jpeg), "JPEG");
        assert_eq!(format!("{}", OutputFormat::Png), "PNG");
    }
}
