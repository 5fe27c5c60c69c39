use crate::error::Result;
use crate::formats::FormatChoice;
use crate::request::{QualityMode, QualityPreset};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "quickpress",
    about = "Batch-compress PNG and JPEG images to a quality level or a target total size",
    long_about = "quickpress compresses PNG and JPEG files one after another. Each file is written \
                  next to its source (or into --output-dir) as <name>_compressed.jpg or \
                  <name>_compressed.png. The source file is never modified.",
    version,
    after_help = "EXAMPLES:\n  \
    quickpress compress photo.jpg -p low\n  \
    quickpress compress ./holiday -r -t 5 -o ./small\n  \
    quickpress compress logo.png -f jpeg -q 85\n  \
    quickpress probe photo.jpg 0.5"
)]
pub struct Args {
    #[arg(long, global = true, help = "Only print errors")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log every quality trial and write")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Compress a batch of images",
        long_about = "Compress files, directories or glob patterns in order. The batch stops at \
                      the first file that cannot be read or encoded; files already written stay."
    )]
    Compress {
        #[arg(
            required = true,
            help = "Input files, directories or glob patterns"
        )]
        inputs: Vec<String>,

        #[arg(
            short = 'o',
            long,
            help = "Output directory (default: beside each source file)"
        )]
        output_dir: Option<PathBuf>,

        #[command(flatten)]
        quality: QualityArgs,

        #[arg(
            short = 'f',
            long,
            default_value = "keep",
            help = "Output format (keep, jpeg, png)",
            long_help = "keep writes each file in its own format (JPEG when unknown). \
                         Converting a transparent image to JPEG drops its alpha channel."
        )]
        format: String,

        #[arg(short = 'r', long, help = "Process subdirectories recursively")]
        recursive: bool,

        #[arg(long, help = "Print the batch report as JSON")]
        json: bool,
    },

    #[command(
        about = "Show the quality search for one image and a target size",
        long_about = "Runs the target-size quality search on a single image without writing \
                      anything and prints every trial."
    )]
    Probe {
        #[arg(help = "Image file")]
        input: PathBuf,

        #[arg(help = "Target size in megabytes")]
        target_size: String,

        #[arg(
            short = 'f',
            long,
            default_value = "jpeg",
            help = "Encoder to probe with (jpeg, png)"
        )]
        format: String,
    },
}

#[derive(ClapArgs, Debug, Default)]
#[group(multiple = false)]
pub struct QualityArgs {
    #[arg(short = 'q', long, help = "Fixed quality level (1-100)")]
    pub quality: Option<u8>,

    #[arg(
        short = 'p',
        long,
        help = "Quality preset: high (90), medium (60), low (30)",
        long_help = "Named quality level. Used when neither --quality nor --target-size \
                     is given; defaults to medium."
    )]
    pub preset: Option<String>,

    #[arg(
        short = 't',
        long,
        help = "Target total size of the batch in megabytes",
        long_help = "The target is shared between files by their original sizes and a quality \
                     is searched for each JPEG output. PNG output is lossless and ignores it."
    )]
    pub target_size: Option<String>,
}

impl QualityArgs {
    pub fn to_mode(&self) -> Result<QualityMode> {
        if let Some(level) = self.quality {
            return QualityMode::fixed(level);
        }
        if let Some(target) = &self.target_size {
            return QualityMode::parse_target_size(target);
        }
        let preset = match &self.preset {
            Some(name) => name.parse::<QualityPreset>()?,
            None => QualityPreset::default(),
        };
        Ok(preset.into())
    }
}

pub fn parse_format(format: &str) -> Result<FormatChoice> {
    format.parse()
}
