pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// Bounds of the target-size quality search. Encoders gain little above 95.
pub const MIN_SEARCH_QUALITY: u8 = 1;
pub const MAX_SEARCH_QUALITY: u8 = 95;

pub const HIGH_QUALITY: u8 = 90;
pub const MEDIUM_QUALITY: u8 = 60;
pub const LOW_QUALITY: u8 = 30;

pub const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

pub const OUTPUT_SUFFIX: &str = "_compressed";

pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// oxipng preset used for every PNG write; 4 is the highest non-zopfli level.
pub const OXIPNG_PRESET: u8 = 4;

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

// Common output message prefixes
pub const ORIGINAL_SIZE_PREFIX: &str = "📊 Total original size:";
pub const COMPRESSED_SIZE_PREFIX: &str = "📈 Total compressed size:";
pub const COMPRESSION_RATIO_PREFIX: &str = "🎯 Overall compression ratio:";
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
pub const ERROR_PREFIX: &str = "❌";
