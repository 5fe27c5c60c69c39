#![allow(dead_code)]

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Deterministic photo-like content: smooth gradients plus pseudo-random grain.
pub fn photo_like(width: u32, height: u32, seed: u32) -> RgbImage {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    RgbImage::from_fn(width, height, |x, y| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let grain = (state % 48) as i32 - 24;
        let channel = |base: u32| (base as i32 + grain).clamp(0, 255) as u8;
        Rgb([
            channel(x * 255 / width.max(1)),
            channel(y * 255 / height.max(1)),
            channel((x + y) * 127 / (width + height).max(1)),
        ])
    })
}

pub fn write_jpeg(path: &Path, width: u32, height: u32, quality: u8, seed: u32) -> PathBuf {
    let image = DynamicImage::ImageRgb8(photo_like(width, height, seed));
    let writer = BufWriter::new(File::create(path).unwrap());
    image
        .write_with_encoder(JpegEncoder::new_with_quality(writer, quality))
        .unwrap();
    path.to_path_buf()
}

pub fn write_png(path: &Path, width: u32, height: u32, seed: u32) -> PathBuf {
    photo_like(width, height, seed).save(path).unwrap();
    path.to_path_buf()
}

/// A PNG whose left half is fully transparent.
pub fn write_alpha_png(path: &Path, width: u32, height: u32) -> PathBuf {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        let alpha = if x < width / 2 { 0 } else { 255 };
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, alpha])
    });
    image.save(path).unwrap();
    path.to_path_buf()
}

/// An 8-bit indexed PNG with a two-entry palette and a tRNS chunk: the left
/// half uses the fully transparent entry, the right half opaque red.
pub fn write_palette_trns_png(path: &Path, width: u32, height: u32) -> PathBuf {
    let mut raw = Vec::new();
    for _ in 0..height {
        raw.push(0); // filter: none
        raw.extend((0..width).map(|x| if x < width / 2 { 1u8 } else { 0u8 }));
    }

    let mut ihdr = Vec::new();
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.extend_from_slice(&[8, 3, 0, 0, 0]); // depth 8, indexed

    let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
    push_chunk(&mut data, b"IHDR", &ihdr);
    push_chunk(&mut data, b"PLTE", &[200, 30, 30, 0, 0, 255]);
    push_chunk(&mut data, b"tRNS", &[255, 0]);
    push_chunk(&mut data, b"IDAT", &zlib_stored(&raw));
    push_chunk(&mut data, b"IEND", &[]);

    std::fs::write(path, data).unwrap();
    path.to_path_buf()
}

fn push_chunk(out: &mut Vec<u8>, kind: &[u8; 4], body: &[u8]) {
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    let start = out.len();
    out.extend_from_slice(kind);
    out.extend_from_slice(body);
    let crc = crc32(&out[start..]);
    out.extend_from_slice(&crc.to_be_bytes());
}

/// zlib stream made of uncompressed deflate blocks.
fn zlib_stored(raw: &[u8]) -> Vec<u8> {
    let mut out = vec![0x78, 0x01];
    let blocks: Vec<&[u8]> = raw.chunks(0xFFFF).collect();
    for (i, block) in blocks.iter().enumerate() {
        out.push(u8::from(i + 1 == blocks.len()));
        let len = block.len() as u16;
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&(!len).to_le_bytes());
        out.extend_from_slice(block);
    }

    let (mut a, mut b) = (1u32, 0u32);
    for &byte in raw {
        a = (a + byte as u32) % 65521;
        b = (b + a) % 65521;
    }
    out.extend_from_slice(&((b << 16) | a).to_be_bytes());
    out
}

fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in bytes {
        crc ^= byte as u32;
        for _ in 0..8 {
            crc = if crc & 1 == 1 {
                (crc >> 1) ^ 0xEDB8_8320
            } else {
                crc >> 1
            };
        }
    }
    !crc
}

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

pub fn create_test_output_directory(temp_dir: &Path) -> PathBuf {
    let output_dir = temp_dir.join("output");
    std::fs::create_dir(&output_dir).unwrap();
    output_dir
}
