//! End-to-end review pipelines for both notification modes.

use std::io::Read;

use chrono::Local;
use pensionkit_io_xlsx::{C_MIME_XLSX, read_sheet};
use polars::prelude::DataFrame;

use crate::classify::classify_review_table;
use crate::conf::{
    C_FILE_NAME_PROCESSED, C_LABEL_DOWNLOAD_FULL, C_LABEL_DOWNLOAD_STYLED, C_SHEET_REVIEW,
    derive_filtered_download_label, derive_filtered_file_name, derive_filtered_sheet_name,
};
use crate::export::export_styled_workbook;
use crate::filter::filter_by_days_remaining;
use crate::spec::{
    EnumReviewMode, EnumReviewOutcome, ReportReview, ReviewError, SpecDownload, SpecReviewRequest,
};

/// Run one upload through classify, optional filter and export.
///
/// Downloads are ordered for display: the filtered subset (when the filter
/// ran and matched rows) precedes the full table.
pub fn run_review<R: Read>(
    source: R,
    request: &SpecReviewRequest,
) -> Result<ReportReview, ReviewError> {
    let date_today = request
        .date_today
        .unwrap_or_else(|| Local::now().date_naive());
    let days_filter = request.resolve_days_filter();

    let df_raw = read_sheet(source, C_SHEET_REVIEW)?;
    let (df_classified, report_classify) =
        classify_review_table(df_raw, request.mode.classify_variant(), date_today)?;
    tracing::info!(
        mode = request.mode.as_label(),
        today = %date_today,
        "{report_classify}"
    );

    let mut downloads = Vec::new();
    let mut df_filtered = None;
    if let Some(n_days) = days_filter {
        let df_subset = filter_by_days_remaining(&df_classified, i64::from(n_days))?;
        if df_subset.height() > 0 {
            downloads.push(build_download(
                &df_subset,
                derive_filtered_sheet_name(n_days),
                derive_filtered_download_label(n_days),
                derive_filtered_file_name(n_days),
            )?);
        } else {
            tracing::info!(days = n_days, "no rows expire in exactly the requested days");
        }
        df_filtered = Some(df_subset);
    }

    let c_label_full = match request.mode {
        EnumReviewMode::AlertNotification => C_LABEL_DOWNLOAD_STYLED,
        EnumReviewMode::ButtonNotification => C_LABEL_DOWNLOAD_FULL,
    };
    downloads.push(build_download(
        &df_classified,
        C_SHEET_REVIEW.to_string(),
        c_label_full.to_string(),
        C_FILE_NAME_PROCESSED.to_string(),
    )?);

    Ok(ReportReview {
        mode: request.mode,
        date_today,
        df_classified,
        days_filter,
        df_filtered,
        downloads,
        report_classify,
    })
}

/// Boundary wrapper: any failure becomes one user-visible message.
pub fn process_upload<R: Read>(source: R, request: &SpecReviewRequest) -> EnumReviewOutcome {
    match run_review(source, request) {
        Ok(report) => EnumReviewOutcome::Completed(Box::new(report)),
        Err(err) => {
            tracing::warn!(mode = request.mode.as_label(), error = %err, "review failed");
            EnumReviewOutcome::Failed {
                message: err.message_user(),
            }
        }
    }
}

fn build_download(
    df: &DataFrame,
    sheet_name: String,
    label: String,
    file_name: String,
) -> Result<SpecDownload, ReviewError> {
    let workbook = export_styled_workbook(df, &sheet_name)?;
    let sheet_name_written = workbook
        .report
        .sheets
        .first()
        .map_or(sheet_name, |sheet| sheet.sheet_name.clone());
    Ok(SpecDownload {
        label,
        file_name,
        sheet_name: sheet_name_written,
        mime_type: C_MIME_XLSX.to_string(),
        bytes: workbook.bytes,
    })
}
