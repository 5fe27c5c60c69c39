//! Target-size quality search.
//!
//! Encoded size only rises roughly with quality, so the search keeps the
//! closest trial it has seen instead of trusting where the bisection ends.

use crate::constants::{MAX_SEARCH_QUALITY, MIN_SEARCH_QUALITY};
use crate::error::Result;
use crate::formats::OutputFormat;
use crate::processing::encode_to_vec;
use image::DynamicImage;
use std::path::Path;
use tracing::debug;

/// Something that can report the encoded size of an image at a quality level
/// without side effects.
pub trait SizeProbe {
    fn encoded_size(&mut self, quality: u8) -> Result<u64>;
}

impl<F> SizeProbe for F
where
    F: FnMut(u8) -> Result<u64>,
{
    fn encoded_size(&mut self, quality: u8) -> Result<u64> {
        self(quality)
    }
}

/// Probes by encoding into memory with the real encoder.
pub struct EncoderProbe<'a> {
    image: &'a DynamicImage,
    format: OutputFormat,
    path: &'a Path,
}

impl<'a> EncoderProbe<'a> {
    /// `path` is only used to label errors.
    pub fn new(image: &'a DynamicImage, format: OutputFormat, path: &'a Path) -> Self {
        Self {
            image,
            format,
            path,
        }
    }
}

impl SizeProbe for EncoderProbe<'_> {
    fn encoded_size(&mut self, quality: u8) -> Result<u64> {
        let encoded = encode_to_vec(self.image, self.format, quality, self.path)?;
        Ok(encoded.len() as u64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trial {
    pub quality: u8,
    pub size: u64,
}

/// Outcome of one search, with every trial in the order it was encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub quality: u8,
    pub size: u64,
    pub trials: Vec<Trial>,
}

/// Finds the quality in `1..=95` whose encoded size lands closest to
/// `target_bytes`.
pub fn find_quality<P: SizeProbe>(probe: &mut P, target_bytes: f64) -> Result<u8> {
    search_quality(probe, target_bytes).map(|outcome| outcome.quality)
}

/// Same as [`find_quality`] but returns the trials as well.
///
/// Bisects on quality: a trial larger than the target moves the upper bound
/// below it, otherwise the lower bound moves above it. At most 7 encodes.
/// On equal distance the earlier trial is kept.
pub fn search_quality<P: SizeProbe>(probe: &mut P, target_bytes: f64) -> Result<SearchOutcome> {
    let mut min = MIN_SEARCH_QUALITY;
    let mut max = MAX_SEARCH_QUALITY;
    let mut best: Option<Trial> = None;
    let mut trials = Vec::new();

    while min <= max {
        let quality = min + (max - min) / 2;
        let size = probe.encoded_size(quality)?;
        let trial = Trial { quality, size };
        trials.push(trial);

        let distance = (size as f64 - target_bytes).abs();
        debug!(quality, size, target_bytes, distance, "quality trial");

        let closer = match best {
            Some(b) => distance < (b.size as f64 - target_bytes).abs(),
            None => true,
        };
        if closer {
            best = Some(trial);
        }

        if size as f64 > target_bytes {
            max = quality - 1;
        } else {
            min = quality + 1;
        }
    }

    // The loop always runs at least once since MIN <= MAX.
    let best = best.unwrap_or(Trial {
        quality: MAX_SEARCH_QUALITY,
        size: 0,
    });

    Ok(SearchOutcome {
        quality: best.quality,
        size: best.size,
        trials,
    })
}
