//! `pensionkit_review` v1:
//! Pension-review expiry classification and styled export.
//!
//! Modules:
//! - `conf`     : sheet/column names, thresholds, alert style table
//! - `spec`     : categories, modes, requests, results, errors
//! - `report`   : classification summary
//! - `classify` : review-date coercion and category assignment
//! - `filter`   : exact remaining-days filter
//! - `export`   : styled single-sheet workbook export
//! - `pipeline` : end-to-end orchestration for both notification modes
//! - `util`     : shared schema checks

pub mod classify;
pub mod conf;
pub mod export;
pub mod filter;
pub mod pipeline;
pub mod report;
pub mod spec;
mod util;

pub use classify::{
    calculate_days_remaining, classify_review_table, coerce_review_dates, derive_expiry_date,
    parse_review_date_text,
};
pub use conf::{
    C_COL_ALERT, C_COL_DAYS_REMAINING, C_COL_EXPIRY_DATE, C_COL_REVIEW_DATE,
    C_FILE_NAME_PROCESSED, C_SHEET_REVIEW, N_DAYS_GREEN_MAX, N_DAYS_RED_MAX, N_DAYS_YELLOW_MAX,
    N_MONTHS_REVIEW_VALIDITY, derive_alert_header_format, derive_default_alert_styles,
};
pub use export::{SpecStyledWorkbook, derive_alert_sheet_options, export_styled_workbook};
pub use filter::filter_by_days_remaining;
pub use pipeline::{process_upload, run_review};
pub use report::ReportClassify;
pub use spec::{
    EnumAlertCategory, EnumClassifyVariant, EnumReviewMode, EnumReviewOutcome, ReportReview,
    ReviewError, SpecDownload, SpecReviewRequest,
};
