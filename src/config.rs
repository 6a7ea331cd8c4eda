//! Run configuration.
//!
//! Every path and constant the pipeline depends on lives in [`AnalysisConfig`],
//! which is either built from [`Default`] or loaded from a JSON file. Missing
//! fields in a file fall back to the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AnalysisError, Result};

/// How the `intensity` column of a cell record is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntensityMode {
    /// Sum of raw pixel values under the whole-image foreground mask.
    /// Every cell of the same image reports the same value.
    #[default]
    WholeMask,
    /// Sum of raw pixel values inside the cell's own filled contour that
    /// are also foreground in the denoised mask.
    PerCell,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory scanned for input images (not recursive).
    pub image_dir: PathBuf,
    /// Spreadsheet written at the end of the run.
    pub output_path: PathBuf,
    /// Case-sensitive filename suffix selecting input images.
    pub extension: String,
    /// Contours with a raw pixel area below this are discarded.
    pub min_area_px: f64,
    /// Physical units per pixel.
    pub scale: f64,
    /// Side of the square median filter window. Must be odd.
    pub median_kernel: u32,
    pub intensity: IntensityMode,
    /// Where the display stage writes its frames. `None` skips the stage.
    pub preview_dir: Option<PathBuf>,
    /// Where annotated contour overlays are written, if anywhere.
    pub overlay_dir: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("."),
            output_path: PathBuf::from("results.xlsx"),
            extension: ".tif".to_string(),
            min_area_px: 10_000.0,
            scale: 0.1,
            median_kernel: 5,
            intensity: IntensityMode::WholeMask,
            preview_dir: None,
            overlay_dir: None,
        }
    }
}

impl AnalysisConfig {
    /// Loads a configuration from a JSON file and validates it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| AnalysisError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&text).map_err(|source| AnalysisError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that numeric settings are usable.
    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "scale must be a positive finite number, got {}",
                self.scale
            )));
        }
        if !self.min_area_px.is_finite() || self.min_area_px < 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "min_area_px must be a non-negative finite number, got {}",
                self.min_area_px
            )));
        }
        if self.median_kernel == 0 || self.median_kernel % 2 == 0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "median_kernel must be odd, got {}",
                self.median_kernel
            )));
        }
        if self.extension.is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "extension must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
