use std::path::PathBuf;

use anyhow::{Context, Result};
use cell_morphometry::{AnalysisConfig, IntensityMode, pipeline};
use clap::{Parser, ValueEnum};

/// Measure cell shape and intensity in a directory of microscopy images
#[derive(Parser, Debug)]
#[command(name = "cellmorph")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON configuration file; command-line options override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory containing the images
    #[arg(short, long, value_name = "DIR")]
    images: Option<PathBuf>,

    /// Spreadsheet to write
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Filename suffix selecting input images (case-sensitive)
    #[arg(short, long)]
    extension: Option<String>,

    /// Physical units per pixel
    #[arg(short, long)]
    scale: Option<f64>,

    /// Minimum raw contour area in pixels
    #[arg(long, value_name = "PX")]
    min_area: Option<f64>,

    /// How the intensity column is computed
    #[arg(long, value_enum)]
    intensity: Option<IntensityArg>,

    /// Write a preview PNG of every image here
    #[arg(long, value_name = "DIR")]
    preview_dir: Option<PathBuf>,

    /// Write images with measured cells outlined here
    #[arg(long, value_name = "DIR")]
    overlay_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum IntensityArg {
    WholeMask,
    PerCell,
}

impl From<IntensityArg> for IntensityMode {
    fn from(arg: IntensityArg) -> Self {
        match arg {
            IntensityArg::WholeMask => IntensityMode::WholeMask,
            IntensityArg::PerCell => IntensityMode::PerCell,
        }
    }
}

impl Args {
    fn into_config(self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => AnalysisConfig::default(),
        };

        if let Some(images) = self.images {
            config.image_dir = images;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if let Some(extension) = self.extension {
            config.extension = extension;
        }
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if let Some(min_area) = self.min_area {
            config.min_area_px = min_area;
        }
        if let Some(intensity) = self.intensity {
            config.intensity = intensity.into();
        }
        if self.preview_dir.is_some() {
            config.preview_dir = self.preview_dir;
        }
        if self.overlay_dir.is_some() {
            config.overlay_dir = self.overlay_dir;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Args::parse().into_config()?;
    let summary = pipeline::run(&config).context("analysis run failed")?;

    println!(
        "{} cell(s) from {} image(s) written to {}",
        summary.cells,
        summary.images,
        summary.output_path.display()
    );
    Ok(())
}
