use std::path::PathBuf;

/// Errors that abort an analysis run.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The image directory could not be listed.
    #[error("failed to read image directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A scanned file could not be opened or decoded as an image.
    #[error("failed to load image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid JSON for [`crate::config::AnalysisConfig`].
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The spreadsheet could not be built or saved.
    #[error("failed to write report: {0}")]
    Report(#[from] rust_xlsxwriter::XlsxError),

    /// An output directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A preview or overlay image could not be written.
    #[error("failed to write image {path}: {source}")]
    Preview {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
