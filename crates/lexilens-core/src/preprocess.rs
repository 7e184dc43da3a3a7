use image::{Rgba, RgbaImage};
use unicode_normalization::UnicodeNormalization;

use crate::geometry::PixelRect;

/// Reduces OCR output to a dictionary key: lowercase `a-z` only.
///
/// Returns `None` when nothing usable is left.
pub fn normalize_word(raw: &str) -> Option<String> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    // NFKC folds fullwidth and ligature forms into plain letters
    let word: String = text
        .nfkc()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_lowercase)
        .collect();

    if word.is_empty() { None } else { Some(word) }
}

/// ITU-R 601 luma, 0-255
pub fn luminance(pixel: &Rgba<u8>) -> f32 {
    let [r, g, b, _] = pixel.0;
    r as f32 * 0.299 + g as f32 * 0.587 + b as f32 * 0.114
}

/// Grayscale then hard threshold; alpha is kept
pub fn binarize(image: &RgbaImage, threshold: u8) -> RgbaImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let value = if luminance(pixel) < threshold as f32 {
            0
        } else {
            255
        };
        pixel.0[0] = value;
        pixel.0[1] = value;
        pixel.0[2] = value;
    }
    out
}

/// Finds the ink around `(x, y)`: expands horizontally, then vertically,
/// until `gap` consecutive blank columns/rows are seen.
///
/// `None` when no dark pixel lies near the starting point.
pub fn word_bounds(
    image: &RgbaImage,
    x: u32,
    y: u32,
    threshold: u8,
    gap: u32,
) -> Option<PixelRect> {
    let (width, height) = image.dimensions();
    if x >= width || y >= height {
        return None;
    }
    let gap = gap.max(1);
    let dark = |px: u32, py: u32| luminance(image.get_pixel(px, py)) < threshold as f32;

    // Band of rows used while searching for the word's horizontal extent
    let band_top = y.saturating_sub(gap);
    let band_bottom = (y + gap).min(height - 1);
    let column_inked = |cx: u32| (band_top..=band_bottom).any(|cy| dark(cx, cy));

    let (left, right) = scan_extent(x, width, gap, column_inked)?;

    let row_inked = |ry: u32| (left..=right).any(|rx| dark(rx, ry));
    let (top, bottom) = scan_extent(y, height, gap, row_inked).unwrap_or((band_top, band_bottom));

    Some(PixelRect {
        x: left,
        y: top,
        width: right - left + 1,
        height: bottom - top + 1,
    })
}

/// Walks outwards from `start` in both directions; returns the outermost
/// inked positions reached before a run of `gap` blanks.
fn scan_extent(
    start: u32,
    len: u32,
    gap: u32,
    inked: impl Fn(u32) -> bool,
) -> Option<(u32, u32)> {
    let mut low: Option<u32> = None;
    let mut high: Option<u32> = None;

    let mut blanks = 0;
    let mut pos = start as i64;
    while pos >= 0 && blanks < gap {
        if inked(pos as u32) {
            low = Some(pos as u32);
            high.get_or_insert(pos as u32);
            blanks = 0;
        } else {
            blanks += 1;
        }
        pos -= 1;
    }

    blanks = 0;
    let mut pos = start + 1;
    while pos < len && blanks < gap {
        if inked(pos) {
            high = Some(pos);
            low.get_or_insert(pos);
            blanks = 0;
        } else {
            blanks += 1;
        }
        pos += 1;
    }

    match (low, high) {
        (Some(low), Some(high)) => Some((low.min(high), high.max(low))),
        _ => None,
    }
}
