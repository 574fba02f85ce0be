//! Shared helpers for the review stages.

use polars::prelude::DataFrame;

use crate::spec::ReviewError;

/// Fail with [`ReviewError::MissingColumn`] unless `column` exists in `df`.
pub fn validate_required_column(
    df: &DataFrame,
    column: &str,
    sheet: &str,
) -> Result<(), ReviewError> {
    if df.get_column_names_str().contains(&column) {
        return Ok(());
    }
    Err(ReviewError::MissingColumn {
        column: column.to_string(),
        sheet: sheet.to_string(),
    })
}
