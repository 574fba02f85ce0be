//! XLSX constants and default preset factories.

use crate::spec::{SpecCellFormat, SpecXlsxFormatPresets};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Last valid Excel serial day number (9999-12-31, 1900 date system).
pub const N_EXCEL_SERIAL_MAX: f64 = 2_958_465.0;
/// Number format used for date columns.
pub const C_NUM_FORMAT_DATE: &str = "yyyy-mm-dd";
/// Number format used for datetime columns.
pub const C_NUM_FORMAT_DATETIME: &str = "yyyy-mm-dd hh:mm:ss";
/// MIME type of an Office Open XML workbook.
pub const C_MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Build default per-kind format presets used by [`crate::writer::XlsxWriter`].
///
/// Body presets stay close to the spreadsheet defaults; only the header row and
/// number/date codes are opinionated.
pub fn derive_default_xlsx_formats() -> SpecXlsxFormatPresets {
    let cfg_base_fmt_spec = SpecCellFormat::default();

    SpecXlsxFormatPresets {
        text: cfg_base_fmt_spec.clone(),
        integer: cfg_base_fmt_spec.with_(SpecCellFormat {
            num_format: Some("0".to_string()),
            ..Default::default()
        }),
        decimal: cfg_base_fmt_spec.clone(),
        date: cfg_base_fmt_spec.with_(SpecCellFormat {
            num_format: Some(C_NUM_FORMAT_DATE.to_string()),
            ..Default::default()
        }),
        datetime: cfg_base_fmt_spec.with_(SpecCellFormat {
            num_format: Some(C_NUM_FORMAT_DATETIME.to_string()),
            ..Default::default()
        }),
        header: cfg_base_fmt_spec.with_(SpecCellFormat {
            bold: Some(true),
            border: Some(1),
            align: Some("center".to_string()),
            valign: Some("top".to_string()),
            ..Default::default()
        }),
    }
}

impl Default for SpecXlsxFormatPresets {
    fn default() -> Self {
        derive_default_xlsx_formats()
    }
}
