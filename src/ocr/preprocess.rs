//! Preprocessing variants applied before OCR.
//!
//! Each variant is a pure function producing a new image; the input is never
//! mutated in place. Contrast and brightness follow multiplicative enhance
//! semantics: contrast interpolates each channel against the image's mean
//! luminance, brightness scales channel values.

use image::{DynamicImage, GrayImage, RgbImage};
use imageproc::contrast::adaptive_threshold;
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{close, open};

/// Contrast factor applied by the Enhanced strategy.
const CONTRAST_FACTOR: f32 = 1.5;

/// Brightness factor applied by the Enhanced strategy, after contrast.
const BRIGHTNESS_FACTOR: f32 = 1.1;

/// Gaussian sigma corresponding to a 3x3 kernel.
const BLUR_SIGMA: f32 = 0.8;

/// Adaptive threshold neighbourhood radius (11x11 block).
const THRESHOLD_BLOCK_RADIUS: u32 = 5;

/// Structuring element radius for the morphological close/open cleanup.
const MORPH_RADIUS: u8 = 1;

/// Single-channel luminance conversion.
pub fn grayscale(image: &DynamicImage) -> DynamicImage {
    DynamicImage::ImageLuma8(image.to_luma8())
}

/// Contrast boost then brightness boost. Order matters.
pub fn enhance(image: &DynamicImage) -> DynamicImage {
    let rgb = image.to_rgb8();
    let contrasted = adjust_contrast(&rgb, CONTRAST_FACTOR);
    let brightened = adjust_brightness(&contrasted, BRIGHTNESS_FACTOR);
    DynamicImage::ImageRgb8(brightened)
}

/// Multiplicative contrast around the image's mean luminance.
///
/// Factor 1.0 is identity; factors above 1.0 push channel values away from
/// the mean.
pub fn adjust_contrast(image: &RgbImage, factor: f32) -> RgbImage {
    let mean = mean_luminance(image);
    map_channels(image, |v| mean + (v - mean) * factor)
}

/// Multiplicative brightness. Factor 1.0 is identity.
pub fn adjust_brightness(image: &RgbImage, factor: f32) -> RgbImage {
    map_channels(image, |v| v * factor)
}

/// Grayscale, blur, adaptive threshold, then morphological close and open.
///
/// Degrades gracefully: when the threshold step cannot run, the blurred
/// grayscale image is returned unchanged so OCR still gets a valid input.
pub fn document(image: &DynamicImage) -> DynamicImage {
    let gray = image.to_luma8();
    let blurred = gaussian_blur_f32(&gray, BLUR_SIGMA);

    let thresholded = match threshold_step(&blurred) {
        Ok(img) => img,
        Err(reason) => {
            tracing::debug!("adaptive threshold skipped: {}", reason);
            return DynamicImage::ImageLuma8(blurred);
        }
    };

    let cleaned = close(&thresholded, Norm::LInf, MORPH_RADIUS);
    let cleaned = open(&cleaned, Norm::LInf, MORPH_RADIUS);
    DynamicImage::ImageLuma8(cleaned)
}

/// Adaptive threshold, refused when the image is smaller than the block.
fn threshold_step(gray: &GrayImage) -> Result<GrayImage, String> {
    let (width, height) = gray.dimensions();
    let block = THRESHOLD_BLOCK_RADIUS * 2 + 1;
    if width < block || height < block {
        return Err(format!(
            "image {}x{} smaller than {}x{} threshold block",
            width, height, block, block
        ));
    }
    Ok(adaptive_threshold(gray, THRESHOLD_BLOCK_RADIUS))
}

/// Mean luminance of an RGB image (ITU-R 601 weights).
fn mean_luminance(image: &RgbImage) -> f32 {
    let count = (image.width() as u64) * (image.height() as u64);
    if count == 0 {
        return 0.0;
    }
    let sum: f64 = image
        .pixels()
        .map(|p| 0.299 * p[0] as f64 + 0.587 * p[1] as f64 + 0.114 * p[2] as f64)
        .sum();
    (sum / count as f64) as f32
}

/// Apply a per-channel transfer function, clamping to [0, 255].
fn map_channels<F: Fn(f32) -> f32>(image: &RgbImage, f: F) -> RgbImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = f(*channel as f32).round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}
