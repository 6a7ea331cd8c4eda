//! Spreadsheet report of cell records.

use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet};
use tracing::info;

use crate::error::Result;
use crate::metrics::CellRecord;

/// Column labels of the report, in order.
///
/// Area and perimeter are written in scaled physical units, so their labels
/// name the unit rather than pixels.
pub const HEADER: [&str; 10] = [
    "Image File",
    "Cell Area (um^2)",
    "Perimeter (um)",
    "Circularity",
    "Solidity",
    "Eccentricity",
    "elongation",
    "distribution",
    "volume",
    "intensity",
];

/// Name of the single worksheet the report is written to.
pub const SHEET_NAME: &str = "Cells";

/// Cell records accumulated over a run, in processing order.
#[derive(Debug, Default)]
pub struct Report {
    rows: Vec<CellRecord>,
}

impl Report {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends records after the existing rows, keeping their order.
    ///
    /// # Arguments
    ///
    /// * `records`: The records of one image, in contour order. Any iterator works,
    ///   so the output of [`crate::metrics::measure_image`] can be passed directly.
    pub fn extend(&mut self, records: impl IntoIterator<Item = CellRecord>) {
        self.rows.extend(records);
    }

    /// Returns the accumulated records in the order they will be written.
    pub fn rows(&self) -> &[CellRecord] {
        &self.rows
    }

    /// Number of data rows, not counting the header.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// `true` when no cell has been recorded. A saved empty report still
    /// contains the header row.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Writes the header and every row to a new workbook at `path`,
    /// replacing any existing file.
    ///
    /// The workbook has a single sheet named [`SHEET_NAME`]. Row 0 holds
    /// [`HEADER`]; each record follows in the column order of `HEADER`.
    /// Undefined eccentricity or elongation values leave their cell empty.
    ///
    /// # Arguments
    ///
    /// * `path`: Destination file. Its parent directory must already exist.
    ///
    /// # Returns
    ///
    /// `Err(AnalysisError::Report)` if the workbook cannot be built or saved.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, label) in HEADER.iter().enumerate() {
            worksheet.write_string(0, col as u16, *label)?;
        }
        for (i, record) in self.rows.iter().enumerate() {
            write_record(worksheet, i as u32 + 1, record)?;
        }

        workbook.save(path)?;
        info!(path = %path.display(), rows = self.rows.len(), "saved report");
        Ok(())
    }
}

fn write_record(worksheet: &mut Worksheet, row: u32, record: &CellRecord) -> Result<()> {
    worksheet.write_string(row, 0, &record.image_file)?;
    worksheet.write_number(row, 1, record.area)?;
    worksheet.write_number(row, 2, record.perimeter)?;
    worksheet.write_number(row, 3, record.circularity)?;
    worksheet.write_number(row, 4, record.solidity)?;
    // Undefined ratios stay blank.
    if let Some(eccentricity) = record.eccentricity {
        worksheet.write_number(row, 5, eccentricity)?;
    }
    if let Some(elongation) = record.elongation {
        worksheet.write_number(row, 6, elongation)?;
    }
    worksheet.write_number(row, 7, record.distribution)?;
    worksheet.write_number(row, 8, record.volume)?;
    worksheet.write_number(row, 9, record.intensity as f64)?;
    Ok(())
}
