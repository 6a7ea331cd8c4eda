//! Batch morphometry of stained-cell microscopy images.
//!
//! Each grayscale image in a directory is thresholded with Otsu's method,
//! denoised with a median filter and split into external contours. Every
//! contour large enough to be a cell is measured (area, perimeter,
//! circularity, solidity, eccentricity, elongation, intensity) and the
//! records of the whole run are written to a single spreadsheet.
//!
//! The geometry helpers work directly on [imageproc] contours and are
//! organized by pipeline stage.

mod colors;
pub mod config;
pub mod contours;
pub mod display;
pub mod error;
pub mod metrics;
pub mod moments;
pub mod overlay;
pub mod pipeline;
pub mod rect;
pub mod report;
pub mod scan;
pub mod segmentation;

pub use config::{AnalysisConfig, IntensityMode};
pub use error::{AnalysisError, Result};
pub use metrics::CellRecord;
pub use pipeline::{RunSummary, run};
