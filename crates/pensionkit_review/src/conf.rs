//! Review constants and default style factories.

use pensionkit_io_xlsx::SpecCellFormat;

use crate::spec::EnumAlertCategory;

/// Worksheet holding the review records.
pub const C_SHEET_REVIEW: &str = "REVISION PENSION 2025";
/// Last review date column.
pub const C_COL_REVIEW_DATE: &str = "FECHA DE ULTIMA REVISION";
/// Derived expiry date column (extended variant only).
pub const C_COL_EXPIRY_DATE: &str = "FECHA VENCIMIENTO";
/// Derived remaining-days column (extended variant only).
pub const C_COL_DAYS_REMAINING: &str = "DIAS_RESTANTES";
/// Derived category label column.
pub const C_COL_ALERT: &str = "ALERTA DE VENCIMIENTO";

/// Validity of one review, in calendar months.
pub const N_MONTHS_REVIEW_VALIDITY: u32 = 36;
/// Upper bound (inclusive) of the red band.
pub const N_DAYS_RED_MAX: i64 = 15;
/// Upper bound (inclusive) of the yellow band.
pub const N_DAYS_YELLOW_MAX: i64 = 30;
/// Upper bound (inclusive) of the green band.
pub const N_DAYS_GREEN_MAX: i64 = 90;

/// Date layouts tried on text review dates, in order.
///
/// Year-first layouts come first; numeric layouts are read month-first and
/// fall back to day-first. Month-name and compact `YYYYMMDD` layouts follow;
/// two-digit years are tried last.
pub const TUP_REVIEW_DATE_FORMATS: [&str; 20] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m.%d.%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%Y%m%d",
    "%m/%d/%y",
    "%m-%d-%y",
    "%m.%d.%y",
    "%d/%m/%y",
    "%d-%m-%y",
    "%d.%m.%y",
];
/// Time-of-day layouts accepted after a text date.
pub const TUP_REVIEW_TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];

/// File name of the full styled export.
pub const C_FILE_NAME_PROCESSED: &str = "archivo_procesado.xlsx";
/// Download label of the full export in alert mode.
pub const C_LABEL_DOWNLOAD_STYLED: &str = "Descargar archivo con estilo";
/// Download label of the full export in button mode.
pub const C_LABEL_DOWNLOAD_FULL: &str = "Descargar archivo completo con estilo";

/// Sheet name of the filtered export.
pub fn derive_filtered_sheet_name(n_days: u32) -> String {
    format!("VENCEN_{n_days}_DIAS")
}

/// File name of the filtered export.
pub fn derive_filtered_file_name(n_days: u32) -> String {
    format!("casos_vencen_{n_days}_dias.xlsx")
}

/// Download label of the filtered export.
pub fn derive_filtered_download_label(n_days: u32) -> String {
    format!("Descargar casos que vencen en {n_days} días")
}

/// Header style of the category column.
pub fn derive_alert_header_format() -> SpecCellFormat {
    SpecCellFormat {
        bold: Some(true),
        bg_color: Some("#5A6772".to_string()),
        font_color: Some("#FFFFFF".to_string()),
        ..Default::default()
    }
}

/// Ordered category -> cell style table applied to the category column.
pub fn derive_default_alert_styles() -> Vec<(EnumAlertCategory, SpecCellFormat)> {
    let fmt_fill = |c_color: &str| SpecCellFormat {
        bg_color: Some(c_color.to_string()),
        ..Default::default()
    };

    vec![
        (
            EnumAlertCategory::RedAlert,
            fmt_fill("#FF6961").with_(SpecCellFormat {
                bold: Some(true),
                ..Default::default()
            }),
        ),
        (
            EnumAlertCategory::YellowAlert,
            fmt_fill("#FFD966").with_(SpecCellFormat {
                bold: Some(true),
                ..Default::default()
            }),
        ),
        (
            EnumAlertCategory::GreenAlert,
            fmt_fill("#77DD77").with_(SpecCellFormat {
                bold: Some(true),
                ..Default::default()
            }),
        ),
        (
            EnumAlertCategory::NoDate,
            fmt_fill("#D3D3D3").with_(SpecCellFormat {
                italic: Some(true),
                ..Default::default()
            }),
        ),
        (EnumAlertCategory::OnTerm, fmt_fill("#9BC2E6")),
    ]
}
