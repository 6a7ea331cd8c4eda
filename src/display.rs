//! Display stage: renders each scanned image for visual inspection.

use std::fs;
use std::path::{Path, PathBuf};

use image::GrayImage;
use tracing::info;

use crate::error::{AnalysisError, Result};
use crate::segmentation::load_gray;

/// Something that can present a titled grayscale frame.
///
/// `show` blocks until the frame is done with; the display stage calls it
/// once per image, in scan order.
pub trait Viewer {
    /// Presents `image` under `title`, the image's filename.
    ///
    /// Implementations decide where the title appears: a window caption, a
    /// file name, or drawn into the frame.
    fn show(&mut self, title: &str, image: &GrayImage) -> Result<()>;
}

/// Headless viewer that writes every frame as `<title stem>.png` into a
/// directory.
///
/// The title is carried by the output filename only: `a.tif` is saved as
/// `a.png`. The raster itself is written unchanged, with no caption, axes or
/// other decorations drawn on it.
pub struct PreviewExporter {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl PreviewExporter {
    /// Creates the target directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| AnalysisError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    /// Paths written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl Viewer for PreviewExporter {
    fn show(&mut self, title: &str, image: &GrayImage) -> Result<()> {
        let path = self.dir.join(frame_name(title, ""));
        image.save(&path).map_err(|source| AnalysisError::Preview {
            path: path.clone(),
            source,
        })?;
        info!(title, path = %path.display(), "rendered preview");
        self.written.push(path);
        Ok(())
    }
}

/// `<stem of title><suffix>.png`
pub(crate) fn frame_name(title: &str, suffix: &str) -> String {
    let stem = Path::new(title)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(title);
    format!("{stem}{suffix}.png")
}

/// Re-reads every image in `files` from `dir` and hands it to `viewer`.
pub fn show_images(dir: &Path, files: &[String], viewer: &mut dyn Viewer) -> Result<()> {
    for file in files {
        let gray = load_gray(&dir.join(file))?;
        viewer.show(file, &gray)?;
    }
    Ok(())
}
