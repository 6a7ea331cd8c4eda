use std::path::Path;

use approx::assert_relative_eq;
use calamine::{Data, Reader, Xlsx, open_workbook};
use cell_morphometry::{
    AnalysisConfig, AnalysisError, IntensityMode,
    display::Viewer,
    pipeline::{analyze, run, run_with_viewer},
};
use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_circle_mut;

fn write_circles(dir: &Path, name: &str, size: (u32, u32), circles: &[((i32, i32), i32)]) {
    let mut img = GrayImage::new(size.0, size.1);
    for &(center, radius) in circles {
        draw_filled_circle_mut(&mut img, center, radius, Luma([255]));
    }
    img.save(dir.join(name)).unwrap();
}

fn config_for(dir: &Path) -> AnalysisConfig {
    AnalysisConfig {
        image_dir: dir.to_path_buf(),
        output_path: dir.join("results.xlsx"),
        ..Default::default()
    }
}

#[test]
fn single_large_circle_yields_one_round_cell() {
    let dir = tempfile::tempdir().unwrap();
    write_circles(dir.path(), "circle.tif", (200, 200), &[((100, 100), 60)]);

    let analysis = analyze(&config_for(dir.path())).unwrap();
    let rows = analysis.report.rows();
    assert_eq!(rows.len(), 1);

    let cell = &rows[0];
    assert_eq!(cell.image_file, "circle.tif");
    // pi * 60^2 * 0.1^2
    assert_relative_eq!(cell.area, 113.1, epsilon = 4.0);
    assert!(
        cell.circularity > 0.85 && cell.circularity < 1.05,
        "circularity {}",
        cell.circularity
    );
    assert!(
        cell.solidity > 0.95 && cell.solidity <= 1.0,
        "solidity {}",
        cell.solidity
    );
    assert_eq!(cell.volume, cell.area);
    assert_eq!(cell.distribution, cell.area / cell.perimeter);
    assert!(cell.eccentricity.unwrap() > 0.95);
    assert!(cell.elongation.unwrap() < 0.35);
    assert!(cell.intensity > 255 * 10_000);
}

#[test]
fn small_circle_is_filtered_out() {
    let dir = tempfile::tempdir().unwrap();
    write_circles(dir.path(), "debris.tif", (200, 200), &[((100, 100), 20)]);

    let analysis = analyze(&config_for(dir.path())).unwrap();
    assert_eq!(analysis.files, ["debris.tif"]);
    assert_eq!(analysis.contours, 1);
    assert!(analysis.report.is_empty());
}

#[test]
fn images_without_cells_produce_header_only_report() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.tif", "b.tif", "c.tif"] {
        GrayImage::new(64, 64).save(dir.path().join(name)).unwrap();
    }
    let config = config_for(dir.path());

    let summary = run(&config).unwrap();
    assert_eq!(summary.images, 3);
    assert_eq!(summary.cells, 0);

    let mut workbook: Xlsx<_> = open_workbook(&config.output_path).unwrap();
    let range = workbook
        .worksheet_range(cell_morphometry::report::SHEET_NAME)
        .unwrap();
    assert_eq!(range.height(), 1);
    let header: Vec<Data> = cell_morphometry::report::HEADER
        .iter()
        .map(|h| Data::String(h.to_string()))
        .collect();
    assert_eq!(range.rows().next().unwrap(), header.as_slice());
}

#[test]
fn cells_of_one_image_share_whole_mask_intensity() {
    let dir = tempfile::tempdir().unwrap();
    write_circles(
        dir.path(),
        "pair.tif",
        (400, 220),
        &[((100, 110), 60), ((290, 110), 70)],
    );

    let whole = analyze(&config_for(dir.path())).unwrap();
    let rows = whole.report.rows();
    assert_eq!(rows.len(), 2);
    assert_ne!(rows[0].area, rows[1].area);
    assert_eq!(rows[0].intensity, rows[1].intensity);

    let per_cell = analyze(&AnalysisConfig {
        intensity: IntensityMode::PerCell,
        ..config_for(dir.path())
    })
    .unwrap();
    let rows = per_cell.report.rows();
    assert_eq!(rows.len(), 2);
    assert_ne!(rows[0].intensity, rows[1].intensity);
    assert_eq!(
        rows[0].intensity + rows[1].intensity,
        whole.report.rows()[0].intensity
    );
}

#[test]
fn rows_follow_sorted_file_order() {
    let dir = tempfile::tempdir().unwrap();
    write_circles(dir.path(), "b.tif", (200, 200), &[((100, 100), 65)]);
    write_circles(dir.path(), "a.tif", (200, 200), &[((100, 100), 62)]);
    write_circles(dir.path(), "ignored.png", (200, 200), &[((100, 100), 62)]);

    let analysis = analyze(&config_for(dir.path())).unwrap();
    let names: Vec<&str> = analysis
        .report
        .rows()
        .iter()
        .map(|r| r.image_file.as_str())
        .collect();
    assert_eq!(names, ["a.tif", "b.tif"]);
}

#[test]
fn scale_changes_units_but_not_filter() {
    let dir = tempfile::tempdir().unwrap();
    write_circles(dir.path(), "circle.tif", (200, 200), &[((100, 100), 60)]);

    let base = analyze(&config_for(dir.path())).unwrap();
    let doubled = analyze(&AnalysisConfig {
        scale: 0.2,
        ..config_for(dir.path())
    })
    .unwrap();

    assert_eq!(doubled.report.len(), 1);
    let (a, b) = (&base.report.rows()[0], &doubled.report.rows()[0]);
    assert_relative_eq!(b.area, a.area * 4.0, max_relative = 1e-12);
    assert_relative_eq!(b.perimeter, a.perimeter * 2.0, max_relative = 1e-12);
    assert_relative_eq!(b.circularity, a.circularity, max_relative = 1e-12);
}

#[test]
fn previews_and_overlays_are_written() {
    let dir = tempfile::tempdir().unwrap();
    write_circles(dir.path(), "cells.tif", (200, 200), &[((100, 100), 60)]);
    let previews = dir.path().join("previews");
    let overlays = dir.path().join("overlays");

    let summary = run(&AnalysisConfig {
        preview_dir: Some(previews.clone()),
        overlay_dir: Some(overlays.clone()),
        ..config_for(dir.path())
    })
    .unwrap();

    assert_eq!(summary.cells, 1);
    assert!(previews.join("cells.png").exists());
    assert!(overlays.join("cells_cells.png").exists());
}

#[test]
fn display_stage_runs_after_report_is_saved() {
    struct CheckingViewer<'a> {
        report: &'a Path,
        titles: Vec<String>,
    }

    impl Viewer for CheckingViewer<'_> {
        fn show(&mut self, title: &str, _image: &GrayImage) -> cell_morphometry::Result<()> {
            assert!(self.report.exists());
            self.titles.push(title.to_string());
            Ok(())
        }
    }

    let dir = tempfile::tempdir().unwrap();
    write_circles(dir.path(), "one.tif", (100, 100), &[]);
    write_circles(dir.path(), "two.tif", (100, 100), &[]);
    let config = config_for(dir.path());

    let mut viewer = CheckingViewer {
        report: &config.output_path,
        titles: Vec::new(),
    };
    run_with_viewer(&config, Some(&mut viewer)).unwrap();
    assert_eq!(viewer.titles, ["one.tif", "two.tif"]);
}

#[test]
fn missing_directory_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir.path().join("nope"));
    assert!(matches!(
        run(&config),
        Err(AnalysisError::ReadDir { .. })
    ));
}

#[test]
fn unreadable_image_is_fatal_and_no_report_is_written() {
    let dir = tempfile::tempdir().unwrap();
    write_circles(dir.path(), "a.tif", (200, 200), &[((100, 100), 60)]);
    std::fs::write(dir.path().join("b.tif"), b"garbage").unwrap();
    let config = config_for(dir.path());

    assert!(matches!(
        run(&config),
        Err(AnalysisError::ImageLoad { .. })
    ));
    assert!(!config.output_path.exists());
}
