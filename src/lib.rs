pub mod batch;
pub mod cli;
pub mod constants;
pub mod error;
pub mod formats;
pub mod logger;
pub mod processing;
pub mod request;
pub mod search;
pub mod utils;
pub mod validation;

pub use batch::{
    allocate_targets, compress_batch, generate_output_path, BatchCompressor, BatchReport,
    BatchSummary, CompressionResult, ProgressEvent, ProgressSink,
};
pub use error::{BatchError, CompressionError, Result};
pub use formats::{FormatChoice, OutputFormat};
pub use request::{CompressionRequest, QualityMode, QualityPreset};
pub use search::{find_quality, search_quality, EncoderProbe, SearchOutcome, SizeProbe, Trial};
pub use validation::{collect_image_files, is_image_file, partition_inputs};
