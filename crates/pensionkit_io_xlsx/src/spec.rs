//! Shared XLSX specification models and error types.

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::PolarsError;
use rust_xlsxwriter::XlsxError;
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell style as a sparse property bag; `None` means "inherit".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    /// `left`, `center`, `right`, ...
    pub align: Option<String>,
    /// `top`, `vcenter`, `bottom`.
    pub valign: Option<String>,
    /// xlsxwriter border index (1 = thin).
    pub border: Option<i64>,
    pub num_format: Option<String>,
    /// Solid fill, `#RRGGBB`.
    pub bg_color: Option<String>,
    /// `#RRGGBB`.
    pub font_color: Option<String>,
}

impl SpecCellFormat {
    /// Overlay `patch` onto a copy of `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Overlay `other`: every property set on `other` wins.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        let pick =
            |lhs: &Option<String>, rhs: &Option<String>| rhs.clone().or_else(|| lhs.clone());
        SpecCellFormat {
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            align: pick(&self.align, &other.align),
            valign: pick(&self.valign, &other.valign),
            border: other.border.or(self.border),
            num_format: pick(&self.num_format, &other.num_format),
            bg_color: pick(&self.bg_color, &other.bg_color),
            font_color: pick(&self.font_color, &other.font_color),
        }
    }
}

/// Per-kind base formats used by the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxFormatPresets {
    /// Text and fallback cells.
    pub text: SpecCellFormat,
    /// Integer dtype columns.
    pub integer: SpecCellFormat,
    /// Float dtype columns.
    pub decimal: SpecCellFormat,
    /// Date dtype columns.
    pub date: SpecCellFormat,
    pub datetime: SpecCellFormat,
    /// Header row.
    pub header: SpecCellFormat,
}

/// Exact-text conditional style for one column.
///
/// Cells whose text equals `text` are rendered with `fmt` by the spreadsheet
/// application; stored values are untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecConditionalTextRule {
    /// Cell text to match.
    pub text: String,
    /// Format applied on match.
    pub fmt: SpecCellFormat,
}

/// Normalized cell value during read/write pipelines.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
    /// Calendar date without time.
    Date(NaiveDate),
    /// Date with a time of day.
    DateTime(NaiveDateTime),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Which cells drive the column width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumAutofitColumnsRule {
    /// Keep spreadsheet default widths.
    None,
    /// Header text only.
    #[default]
    Header,
    /// Header text and every body cell.
    All,
}

/// Column width policy of one sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecAutofitCellsPolicy {
    pub rule_columns: EnumAutofitColumnsRule,
    /// Lower clamp of the final width.
    pub width_cell_min: usize,
    /// Upper clamp of the final width.
    pub width_cell_max: usize,
    /// Added to the measured width before clamping.
    pub width_cell_padding: usize,
}

impl Default for SpecAutofitCellsPolicy {
    fn default() -> Self {
        Self {
            rule_columns: EnumAutofitColumnsRule::Header,
            width_cell_min: 8,
            width_cell_max: 60,
            width_cell_padding: 2,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Sheet emitted by one write call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetWritten {
    /// Name after sanitizing.
    pub sheet_name: String,
    /// Data rows written below the header.
    pub height_data: usize,
    /// Columns written.
    pub width_data: usize,
    /// Conditional format ranges registered on the sheet.
    pub cnt_rules_conditional: usize,
}

/// Outcome of one write call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Sheets produced by the write call.
    pub sheets: Vec<SpecSheetWritten>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Top-level read/write failures.
#[derive(Debug, Error)]
pub enum XlsxIoError {
    /// Input bytes are not a readable spreadsheet.
    #[error("Failed to open workbook: {0}")]
    WorkbookUnreadable(String),
    /// Requested worksheet is absent.
    #[error("Worksheet not found: {0:?}")]
    SheetNotFound(String),
    /// Table shape or content cannot be represented in a sheet.
    #[error("Invalid sheet data: {0}")]
    InvalidData(String),
    /// DataFrame construction/access failure.
    #[error("DataFrame error: {0}")]
    DataFrame(#[from] PolarsError),
    /// Workbook serialization failure.
    #[error("xlsx write error: {0}")]
    Write(#[from] XlsxError),
    /// Input stream could not be drained.
    #[error("Failed to read input stream: {0}")]
    Io(#[from] std::io::Error),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
