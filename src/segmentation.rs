//! Grayscale loading and foreground segmentation.

use std::path::Path;

use image::{GrayImage, Luma};
use imageproc::contours::{Contour, find_contours};
use tracing::debug;

use crate::contours::{compress_chain, retain_external};
use crate::error::{AnalysisError, Result};

/// One image after thresholding and contour extraction.
pub struct Segmentation {
    /// Raw grayscale intensities as loaded from disk.
    pub gray: GrayImage,
    /// Denoised 0/255 foreground mask.
    pub mask: GrayImage,
    /// Outer borders of the top-level foreground regions, corners only.
    pub contours: Vec<Contour<i32>>,
}

/// Loads `path` as a single-channel 8-bit image.
pub fn load_gray(path: &Path) -> Result<GrayImage> {
    image::open(path)
        .map(|img| img.to_luma8())
        .map_err(|source| AnalysisError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })
}

/// Binarizes `gray` at its Otsu level: pixels strictly above the level
/// become 255, all others 0.
pub fn otsu_binarize(gray: &GrayImage) -> (GrayImage, u8) {
    let level = imageproc::contrast::otsu_level(gray);

    let mut binary = gray.clone();
    for p in binary.pixels_mut() {
        *p = if p.0[0] > level { Luma([255]) } else { Luma([0]) };
    }

    (binary, level)
}

/// Median filter over a `kernel x kernel` window.
pub fn denoise(binary: &GrayImage, kernel: u32) -> GrayImage {
    let radius = kernel / 2;
    imageproc::filter::median_filter(binary, radius, radius)
}

/// External contours of `mask`, reduced to the vertices where the boundary
/// changes direction.
pub fn external_contours(mask: &GrayImage) -> Vec<Contour<i32>> {
    let mut contours = find_contours::<i32>(mask);
    retain_external(&mut contours);

    contours
        .into_iter()
        .map(|contour| Contour {
            points: compress_chain(contour.points),
            ..contour
        })
        .collect()
}

/// Runs threshold, denoise and contour extraction on an already loaded image.
pub fn segment(gray: GrayImage, median_kernel: u32) -> Segmentation {
    let (binary, level) = otsu_binarize(&gray);
    let mask = denoise(&binary, median_kernel);
    let contours = external_contours(&mask);
    debug!(otsu_level = level, contours = contours.len(), "segmented image");

    Segmentation {
        gray,
        mask,
        contours,
    }
}

/// Loads and segments the image at `path`.
pub fn segment_file(path: &Path, median_kernel: u32) -> Result<Segmentation> {
    let gray = load_gray(path)?;
    Ok(segment(gray, median_kernel))
}
