//! Exact remaining-days filter.

use polars::prelude::{BooleanChunked, DataFrame};

use crate::conf::{C_COL_DAYS_REMAINING, C_SHEET_REVIEW};
use crate::spec::ReviewError;
use crate::util::validate_required_column;

/// Keep rows whose remaining days equal `n_days`; null rows never match.
pub fn filter_by_days_remaining(df: &DataFrame, n_days: i64) -> Result<DataFrame, ReviewError> {
    validate_required_column(df, C_COL_DAYS_REMAINING, C_SHEET_REVIEW)?;

    let ca_days = df.column(C_COL_DAYS_REMAINING)?.i64()?;
    let mask: BooleanChunked = ca_days
        .into_iter()
        .map(|n_days_row| Some(n_days_row == Some(n_days)))
        .collect();

    let df_filtered = df.filter(&mask)?;
    tracing::debug!(
        days = n_days,
        height_in = df.height(),
        height_out = df_filtered.height(),
        "rows filtered by remaining days"
    );
    Ok(df_filtered)
}
