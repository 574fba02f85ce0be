//! Review categories, request/result models and errors.

use chrono::NaiveDate;
use pensionkit_io_xlsx::XlsxIoError;
use polars::prelude::{DataFrame, PolarsError};
use thiserror::Error;

use crate::conf::{N_DAYS_GREEN_MAX, N_DAYS_RED_MAX, N_DAYS_YELLOW_MAX};
use crate::report::ReportClassify;

////////////////////////////////////////////////////////////////////////////////
// #region AlertCategory

/// Expiry category of one review record.
///
/// Variants are declared in evaluation priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnumAlertCategory {
    /// Review date missing or unparseable.
    NoDate,
    /// Remaining days <= 15 (already expired included).
    RedAlert,
    /// 15 < remaining days <= 30.
    YellowAlert,
    /// 30 < remaining days <= 90.
    GreenAlert,
    /// Remaining days > 90.
    OnTerm,
}

impl EnumAlertCategory {
    /// All categories in priority order.
    pub const ALL: [EnumAlertCategory; 5] = [
        Self::NoDate,
        Self::RedAlert,
        Self::YellowAlert,
        Self::GreenAlert,
        Self::OnTerm,
    ];

    /// Classify a remaining-days value; `None` means no review date.
    pub fn from_days_remaining(n_days: Option<i64>) -> Self {
        match n_days {
            None => Self::NoDate,
            Some(n) if n <= N_DAYS_RED_MAX => Self::RedAlert,
            Some(n) if n <= N_DAYS_YELLOW_MAX => Self::YellowAlert,
            Some(n) if n <= N_DAYS_GREEN_MAX => Self::GreenAlert,
            Some(_) => Self::OnTerm,
        }
    }

    /// Label written into the category column.
    pub fn as_label(self) -> &'static str {
        match self {
            Self::NoDate => "SIN FECHA",
            Self::RedAlert => "ALERTA ROJA",
            Self::YellowAlert => "ALERTA AMARILLA",
            Self::GreenAlert => "ALERTA VERDE",
            Self::OnTerm => "EN TÉRMINOS",
        }
    }

    /// Inverse of [`Self::as_label`].
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_label() == label)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReviewRequest

/// Which derived columns the classifier keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumClassifyVariant {
    /// Append only the category column.
    #[default]
    Basic,
    /// Also keep expiry date and remaining days.
    Extended,
}

/// Host-side workflow selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumReviewMode {
    /// Classify and export the full table.
    #[default]
    AlertNotification,
    /// Classify, optionally filter by remaining days, export subset and full table.
    ButtonNotification,
}

impl EnumReviewMode {
    /// Menu label shown by the host UI.
    pub fn as_label(self) -> &'static str {
        match self {
            Self::AlertNotification => "Notificación Alerta",
            Self::ButtonNotification => "Notificación Botón",
        }
    }

    /// Parse a menu label.
    pub fn from_label(label: &str) -> Option<Self> {
        [Self::AlertNotification, Self::ButtonNotification]
            .into_iter()
            .find(|mode| mode.as_label() == label.trim())
    }

    /// Classifier variant used by this workflow.
    pub fn classify_variant(self) -> EnumClassifyVariant {
        match self {
            Self::AlertNotification => EnumClassifyVariant::Basic,
            Self::ButtonNotification => EnumClassifyVariant::Extended,
        }
    }
}

/// Per-upload parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecReviewRequest {
    /// Selected workflow.
    pub mode: EnumReviewMode,
    /// Exact remaining-days filter (button mode only); `0` counts as unset.
    pub days_filter: Option<u32>,
    /// Reference date; the local date is used when `None`.
    pub date_today: Option<NaiveDate>,
}

impl SpecReviewRequest {
    /// Effective filter value, if the filter should run.
    pub fn resolve_days_filter(&self) -> Option<u32> {
        match self.mode {
            EnumReviewMode::ButtonNotification => self.days_filter.filter(|n| *n > 0),
            EnumReviewMode::AlertNotification => None,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReviewResult

/// One downloadable workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDownload {
    /// Button label.
    pub label: String,
    /// Suggested file name.
    pub file_name: String,
    /// Sheet written in the workbook.
    pub sheet_name: String,
    /// MIME type of `bytes`.
    pub mime_type: String,
    /// Self-contained xlsx document.
    pub bytes: Vec<u8>,
}

/// Successful pipeline result.
#[derive(Debug, Clone)]
pub struct ReportReview {
    /// Workflow that produced this result.
    pub mode: EnumReviewMode,
    /// Reference date used for remaining days.
    pub date_today: NaiveDate,
    /// Classified table for display.
    pub df_classified: DataFrame,
    /// Filter value applied, if any.
    pub days_filter: Option<u32>,
    /// Filtered table for display; present whenever the filter ran.
    pub df_filtered: Option<DataFrame>,
    /// Downloads in display order (filtered subset first).
    pub downloads: Vec<SpecDownload>,
    /// Per-category counts over the full table.
    pub report_classify: ReportClassify,
}

impl ReportReview {
    /// Caption displayed above the filtered table.
    pub fn caption_filtered(&self) -> Option<String> {
        self.days_filter
            .map(|n_days| format!("Casos que vencen exactamente en {n_days} días:"))
    }
}

/// Boundary outcome handed to the host UI.
#[derive(Debug, Clone)]
pub enum EnumReviewOutcome {
    /// Pipeline finished.
    Completed(Box<ReportReview>),
    /// Pipeline failed; nothing was produced.
    Failed {
        /// User-visible message.
        message: String,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Review pipeline failures.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// A required column is absent.
    #[error("La columna '{column}' no está en la hoja {sheet}.")]
    MissingColumn {
        /// Missing column name.
        column: String,
        /// Sheet that was inspected.
        sheet: String,
    },
    /// Any other failure (unreadable input, missing sheet, write failure).
    #[error("Error al procesar el archivo: {0}")]
    Processing(String),
}

impl ReviewError {
    /// Message shown to the user, prefixed with the severity marker.
    pub fn message_user(&self) -> String {
        match self {
            Self::MissingColumn { .. } => format!("⚠️ {self}"),
            Self::Processing(_) => format!("❌ {self}"),
        }
    }
}

impl From<XlsxIoError> for ReviewError {
    fn from(err: XlsxIoError) -> Self {
        Self::Processing(err.to_string())
    }
}

impl From<PolarsError> for ReviewError {
    fn from(err: PolarsError) -> Self {
        Self::Processing(err.to_string())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
