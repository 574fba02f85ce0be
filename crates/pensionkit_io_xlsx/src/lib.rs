//! `pensionkit_io_xlsx` v1:
//! Rust-side spreadsheet I/O kernel.
//!
//! Modules:
//! - `conf`   : constants and default presets
//! - `spec`   : specs/models/options/errors
//! - `util`   : pure helper functions
//! - `reader` : worksheet -> `DataFrame` loader (calamine)
//! - `writer` : `DataFrame` -> in-memory workbook kernel (rust_xlsxwriter)
pub mod conf;
pub mod reader;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_MIME_XLSX, C_NUM_FORMAT_DATE, C_NUM_FORMAT_DATETIME, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX,
    N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
pub use reader::{read_sheet, read_sheet_from_bytes};
pub use spec::{
    EnumAutofitColumnsRule, EnumCellValue, SpecAutofitCellsPolicy, SpecCellFormat,
    SpecConditionalTextRule, SpecSheetWritten, SpecXlsxFormatPresets, SpecXlsxReport,
    XlsxIoError,
};
pub use util::{
    build_date_column, build_datetime_column, convert_dataframe_to_ipc_bytes,
    convert_date_to_epoch_days, convert_datetime_to_excel_serial, convert_epoch_days_to_date,
    convert_excel_serial_to_date, convert_timestamp_to_datetime, derive_unique_column_names,
    sanitize_sheet_name,
};
pub use writer::{SpecXlsxSheetWriteOptions, XlsxWriter};
