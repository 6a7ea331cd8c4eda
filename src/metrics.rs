//! Per-cell shape and intensity measurements.

use std::f64::consts::PI;

use image::{GrayImage, Luma};
use imageproc::{drawing::draw_polygon_mut, point::Point};
use tracing::{debug, warn};

use crate::config::IntensityMode;
use crate::contours::{approximate_closed, closed_perimeter, convex_hull_area, polygon_area};
use crate::moments::Moments;
use crate::rect::bounding_rect;

/// Douglas-Peucker tolerance as a fraction of the contour perimeter.
const APPROX_EPSILON_FRACTION: f64 = 0.02;

/// Measurements of one segmented cell. Lengths and areas are in scaled units.
#[derive(Debug, Clone, PartialEq)]
pub struct CellRecord {
    /// Filename of the source image, without its directory.
    pub image_file: String,
    /// Polygon area of the contour times `scale^2`.
    pub area: f64,
    /// Closed contour length times `scale`.
    pub perimeter: f64,
    /// `4 pi area / perimeter^2`; `1.0` for a perfect disc.
    pub circularity: f64,
    /// Contour area over convex hull area, in `[0, 1]` for simple polygons.
    pub solidity: f64,
    /// `None` when the contour's second order moments vanish.
    pub eccentricity: Option<f64>,
    /// Measured on the Douglas-Peucker approximation of the contour.
    pub elongation: Option<f64>,
    /// `area / perimeter`.
    pub distribution: f64,
    /// Same value as `area`.
    pub volume: f64,
    /// Sum of raw pixel values, see [`IntensityMode`].
    pub intensity: u64,
}

/// Settings shared by every contour measurement in a run.
#[derive(Debug, Clone, Copy)]
pub struct MeasureOptions {
    /// Smallest raw contour area, in pixels, that counts as a cell.
    pub min_area_px: f64,
    /// Physical length of one pixel edge.
    pub scale: f64,
    /// How the intensity column is summed.
    pub intensity: IntensityMode,
}

/// `4 pi area / perimeter^2`, or `0.0` for a zero perimeter.
pub fn circularity(area: f64, perimeter: f64) -> f64 {
    if perimeter != 0.0 {
        4.0 * PI * area / (perimeter * perimeter)
    } else {
        0.0
    }
}

/// Ratio of contour area to convex hull area, both in scaled units.
///
/// `0.0` for contours of two points or fewer, and when the hull has no area.
pub fn solidity(points: &[Point<i32>], scaled_area: f64, scale: f64) -> f64 {
    if points.len() <= 2 {
        return 0.0;
    }
    let hull_area = convex_hull_area(points) * scale * scale;
    if hull_area != 0.0 {
        scaled_area / hull_area
    } else {
        0.0
    }
}

/// Whether a contour with `raw_area` pixels counts as a cell.
pub fn passes_area_filter(raw_area: f64, min_area_px: f64) -> bool {
    raw_area >= min_area_px
}

/// Sum of `gray` over every foreground pixel of `mask`.
pub fn mask_intensity(gray: &GrayImage, mask: &GrayImage) -> u64 {
    gray.pixels()
        .zip(mask.pixels())
        .filter(|(_, m)| m.0[0] > 0)
        .map(|(g, _)| u64::from(g.0[0]))
        .sum()
}

/// Sum of `gray` over the pixels inside the filled contour that are also
/// foreground in `mask`.
pub fn contour_intensity(gray: &GrayImage, mask: &GrayImage, points: &[Point<i32>]) -> u64 {
    let (width, height) = gray.dimensions();
    let Some(bounds) = bounding_rect(points, width, height) else {
        return 0;
    };

    let mut fill = GrayImage::new(width, height);
    let mut polygon = points.to_vec();
    while polygon.len() > 1 && polygon.first() == polygon.last() {
        polygon.pop();
    }
    match polygon.len() {
        0 => return 0,
        1 => {
            let p = polygon[0];
            if p.x >= 0 && p.y >= 0 && (p.x as u32) < width && (p.y as u32) < height {
                fill.put_pixel(p.x as u32, p.y as u32, Luma([255]));
            }
        }
        _ => draw_polygon_mut(&mut fill, &polygon, Luma([255])),
    }

    let mut total = 0u64;
    for y in bounds.y..bounds.y + bounds.height {
        for x in bounds.x..bounds.x + bounds.width {
            if fill.get_pixel(x, y).0[0] > 0 && mask.get_pixel(x, y).0[0] > 0 {
                total += u64::from(gray.get_pixel(x, y).0[0]);
            }
        }
    }
    total
}

/// Measures every qualifying contour of one segmented image.
///
/// Contours are visited in order; those whose raw area is below
/// `options.min_area_px` produce no record.
///
/// # Arguments
///
/// * `image_file`: Name written to every record of this image.
/// * `gray`: Raw grayscale pixels, summed for the intensity column.
/// * `mask`: Denoised binary mask the contours were traced from.
/// * `contours`: External contours, in tracing order.
/// * `options`: Area filter, scale and intensity mode.
///
/// # Returns
///
/// One record per qualifying contour, in contour order.
pub fn measure_image(
    image_file: &str,
    gray: &GrayImage,
    mask: &GrayImage,
    contours: &[Vec<Point<i32>>],
    options: &MeasureOptions,
) -> Vec<CellRecord> {
    let whole_mask = match options.intensity {
        IntensityMode::WholeMask => Some(mask_intensity(gray, mask)),
        IntensityMode::PerCell => None,
    };

    contours
        .iter()
        .enumerate()
        .filter_map(|(idx, points)| {
            let raw_area = polygon_area(points);
            if !passes_area_filter(raw_area, options.min_area_px) {
                debug!(image_file, contour = idx, raw_area, "contour below area filter");
                return None;
            }

            let intensity =
                whole_mask.unwrap_or_else(|| contour_intensity(gray, mask, points));
            Some(measure_contour(
                image_file,
                points,
                raw_area,
                options.scale,
                intensity,
            ))
        })
        .collect()
}

/// Shape measurements of a single contour that already passed the area filter.
///
/// `raw_area` is the contour's pixel area, reused rather than recomputed.
/// Eccentricity and elongation are `None` when the moments they are built
/// from vanish; such contours are logged at `warn` level.
pub fn measure_contour(
    image_file: &str,
    points: &[Point<i32>],
    raw_area: f64,
    scale: f64,
    intensity: u64,
) -> CellRecord {
    let raw_perimeter = closed_perimeter(points);
    let area = raw_area * scale * scale;
    let perimeter = raw_perimeter * scale;

    let eccentricity = Moments::of_polygon(points).eccentricity();

    let approx = approximate_closed(points, APPROX_EPSILON_FRACTION * raw_perimeter);
    let elongation = Moments::of_polygon(&approx).elongation();
    if eccentricity.is_none() || elongation.is_none() {
        warn!(
            image_file,
            raw_area,
            eccentricity = ?eccentricity,
            elongation = ?elongation,
            "undefined moment ratio, leaving cell blank"
        );
    }

    let distribution = if perimeter != 0.0 {
        area / perimeter
    } else {
        0.0
    };

    CellRecord {
        image_file: image_file.to_string(),
        area,
        perimeter,
        circularity: circularity(area, perimeter),
        solidity: solidity(points, area, scale),
        eccentricity,
        elongation,
        distribution,
        volume: area,
        intensity,
    }
}
