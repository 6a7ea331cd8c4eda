//! End-to-end batch run: scan, segment, measure, report, display.

use std::path::PathBuf;

use imageproc::point::Point;
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::contours::polygon_area;
use crate::display::{PreviewExporter, Viewer, show_images};
use crate::error::Result;
use crate::metrics::{MeasureOptions, measure_image, passes_area_filter};
use crate::overlay::save_overlay;
use crate::report::Report;
use crate::scan::scan_images;
use crate::segmentation::segment_file;

/// What a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub images: usize,
    pub contours: usize,
    pub cells: usize,
    pub output_path: PathBuf,
}

/// Scanned files and the records measured from them.
#[derive(Debug)]
pub struct Analysis {
    pub files: Vec<String>,
    pub report: Report,
    /// External contours seen across all images, before the area filter.
    pub contours: usize,
}

/// Scans, segments and measures every image, returning the accumulated
/// report without writing it.
pub fn analyze(config: &AnalysisConfig) -> Result<Analysis> {
    config.validate()?;

    let files = scan_images(&config.image_dir, &config.extension)?;
    info!(dir = %config.image_dir.display(), images = files.len(), "scanned image directory");

    let options = MeasureOptions {
        min_area_px: config.min_area_px,
        scale: config.scale,
        intensity: config.intensity,
    };

    let mut report = Report::new();
    let mut contour_count = 0;
    for file in &files {
        let segmentation = segment_file(&config.image_dir.join(file), config.median_kernel)?;
        let contours: Vec<Vec<Point<i32>>> = segmentation
            .contours
            .into_iter()
            .map(|contour| contour.points)
            .collect();
        contour_count += contours.len();

        let records = measure_image(
            file,
            &segmentation.gray,
            &segmentation.mask,
            &contours,
            &options,
        );
        info!(image = %file, contours = contours.len(), cells = records.len(), "measured image");

        if let Some(dir) = &config.overlay_dir {
            let cells: Vec<&[Point<i32>]> = contours
                .iter()
                .filter(|points| passes_area_filter(polygon_area(points), config.min_area_px))
                .map(Vec::as_slice)
                .collect();
            save_overlay(dir, file, &segmentation.gray, &cells)?;
        }

        report.extend(records);
    }

    Ok(Analysis {
        files,
        report,
        contours: contour_count,
    })
}

/// Runs the whole batch: writes the report, then renders previews when a
/// preview directory is configured.
pub fn run(config: &AnalysisConfig) -> Result<RunSummary> {
    let mut viewer = config
        .preview_dir
        .as_ref()
        .map(PreviewExporter::new)
        .transpose()?;
    run_with_viewer(
        config,
        viewer.as_mut().map(|v| v as &mut dyn Viewer),
    )
}

/// Like [`run`], but the display stage goes through `viewer`, if any.
pub fn run_with_viewer(
    config: &AnalysisConfig,
    viewer: Option<&mut dyn Viewer>,
) -> Result<RunSummary> {
    let Analysis {
        files,
        report,
        contours,
    } = analyze(config)?;
    report.save(&config.output_path)?;

    match viewer {
        Some(viewer) => show_images(&config.image_dir, &files, viewer)?,
        None => debug!("no viewer configured, skipping display stage"),
    }

    let summary = RunSummary {
        images: files.len(),
        contours,
        cells: report.len(),
        output_path: config.output_path.clone(),
    };
    info!(
        images = summary.images,
        contours = summary.contours,
        cells = summary.cells,
        "run complete"
    );
    Ok(summary)
}
