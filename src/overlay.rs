//! Annotated overlays: the grayscale image with every measured cell outlined.

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, RgbImage};
use imageproc::{drawing::draw_line_segment_mut, point::Point};
use tracing::debug;

use crate::colors::outline_colors;
use crate::display::frame_name;
use crate::error::{AnalysisError, Result};

/// Draws each contour as a closed outline, one colour per contour.
pub fn draw_outlines(gray: &GrayImage, contours: &[&[Point<i32>]]) -> RgbImage {
    let mut canvas = DynamicImage::ImageLuma8(gray.clone()).to_rgb8();
    let colors = outline_colors(contours.len());

    for (points, color) in contours.iter().zip(colors) {
        for (p1, p2) in points.iter().zip(points.iter().cycle().skip(1)) {
            draw_line_segment_mut(
                &mut canvas,
                (p1.x as f32, p1.y as f32),
                (p2.x as f32, p2.y as f32),
                color,
            );
        }
    }

    canvas
}

/// Writes `<stem>_cells.png` into `dir` and returns its path.
pub fn save_overlay(
    dir: &Path,
    image_file: &str,
    gray: &GrayImage,
    contours: &[&[Point<i32>]],
) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|source| AnalysisError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(frame_name(image_file, "_cells"));
    draw_outlines(gray, contours)
        .save(&path)
        .map_err(|source| AnalysisError::Preview {
            path: path.clone(),
            source,
        })?;
    debug!(path = %path.display(), cells = contours.len(), "saved overlay");
    Ok(path)
}
