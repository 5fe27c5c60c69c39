use crate::constants::OXIPNG_PRESET;
use crate::error::{CompressionError, Result};
use crate::formats::OutputFormat;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use oxipng::Options;
use std::fs;
use std::path::Path;

/// A decoded image together with the format its bytes were stored in.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub image: DynamicImage,
    pub native_format: Option<ImageFormat>,
}

/// Decodes an image, sniffing the real format from its content rather than
/// trusting the extension.
pub fn load_image(path: &Path) -> Result<SourceImage> {
    let reader = ImageReader::open(path)
        .map_err(|e| CompressionError::io(path, e))?
        .with_guessed_format()
        .map_err(|e| CompressionError::io(path, e))?;
    let native_format = reader.format();
    let image = reader
        .decode()
        .map_err(|e| CompressionError::image(path, e))?;

    Ok(SourceImage {
        image,
        native_format,
    })
}

/// Reads only enough of the file to identify its format from content.
pub fn sniff_format(path: &Path) -> Result<Option<ImageFormat>> {
    let reader = ImageReader::open(path)
        .map_err(|e| CompressionError::io(path, e))?
        .with_guessed_format()
        .map_err(|e| CompressionError::io(path, e))?;
    Ok(reader.format())
}

/// Converts an image into a pixel layout the encoder for `format` accepts.
///
/// JPEG has no alpha channel, so RGBA and LA inputs lose it here; 16-bit and
/// float layouts are narrowed to 8-bit RGB. PNG takes every layout as-is.
pub fn prepare_for_format(image: DynamicImage, format: OutputFormat) -> DynamicImage {
    match format {
        OutputFormat::Png => image,
        OutputFormat::Jpeg => match image {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image,
            DynamicImage::ImageLuma16(_) => DynamicImage::ImageLuma8(image.to_luma8()),
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        },
    }
}

/// Encodes into memory. Nothing touches the disk.
///
/// `quality` only applies to JPEG. PNG output is always the lossless
/// oxipng-optimized encoding of the pixels. JPEG output is baseline with the
/// standard Huffman tables; it is not Huffman-optimized, so quality is the
/// only size control.
pub fn encode_to_vec(
    image: &DynamicImage,
    format: OutputFormat,
    quality: u8,
    path: &Path,
) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();

    match format {
        OutputFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
            image
                .write_with_encoder(encoder)
                .map_err(|e| CompressionError::image(path, e))?;
        }
        OutputFormat::Png => {
            image
                .write_with_encoder(PngEncoder::new(&mut buffer))
                .map_err(|e| CompressionError::image(path, e))?;

            let options = Options::from_preset(OXIPNG_PRESET);
            buffer = oxipng::optimize_from_memory(&buffer, &options).map_err(|e| {
                CompressionError::PngOptimization {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            })?;
        }
    }

    Ok(buffer)
}

/// Encodes and writes `output`, returning the size measured from disk.
pub fn save_image(
    image: &DynamicImage,
    output: &Path,
    format: OutputFormat,
    quality: u8,
) -> Result<u64> {
    let encoded = encode_to_vec(image, format, quality, output)?;

    fs::write(output, &encoded).map_err(|e| CompressionError::io(output, e))?;
    let written = fs::metadata(output)
        .map_err(|e| CompressionError::io(output, e))?
        .len();

    Ok(written)
}
