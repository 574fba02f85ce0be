//! Styled single-sheet export of a classified review table.

use std::collections::BTreeMap;

use pensionkit_io_xlsx::{
    EnumAutofitColumnsRule, SpecAutofitCellsPolicy, SpecConditionalTextRule, SpecXlsxReport,
    SpecXlsxSheetWriteOptions, XlsxWriter,
};
use polars::prelude::DataFrame;

use crate::conf::{C_COL_ALERT, derive_alert_header_format, derive_default_alert_styles};
use crate::spec::ReviewError;
use crate::util::validate_required_column;

/// Serialized workbook plus the writer report.
#[derive(Debug, Clone)]
pub struct SpecStyledWorkbook {
    /// Self-contained xlsx document.
    pub bytes: Vec<u8>,
    /// What the writer emitted.
    pub report: SpecXlsxReport,
}

/// Sheet options styling the category column: header override and one
/// exact-label rule per category. Widths fit header and body text.
pub fn derive_alert_sheet_options() -> SpecXlsxSheetWriteOptions {
    let l_rules: Vec<SpecConditionalTextRule> = derive_default_alert_styles()
        .into_iter()
        .map(|(category, fmt)| SpecConditionalTextRule {
            text: category.as_label().to_string(),
            fmt,
        })
        .collect();

    SpecXlsxSheetWriteOptions {
        cols_fmt_header_overrides: BTreeMap::from([(
            C_COL_ALERT.to_string(),
            derive_alert_header_format(),
        )]),
        cols_rules_conditional: BTreeMap::from([(C_COL_ALERT.to_string(), l_rules)]),
        policy_autofit: SpecAutofitCellsPolicy {
            rule_columns: EnumAutofitColumnsRule::All,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Write `df` into a one-sheet workbook with the category column styled.
///
/// Values are written unchanged; styling lives in conditional formats.
pub fn export_styled_workbook(
    df: &DataFrame,
    sheet_name: &str,
) -> Result<SpecStyledWorkbook, ReviewError> {
    validate_required_column(df, C_COL_ALERT, sheet_name)?;

    let mut writer = XlsxWriter::default();
    writer.write_sheet_from_dataframe(df, sheet_name, &derive_alert_sheet_options())?;

    let mut report = SpecXlsxReport::default();
    for report_sheet in writer.report() {
        for c_warning in &report_sheet.warnings {
            tracing::warn!(sheet = sheet_name, "{c_warning}");
        }
        report.sheets.extend(report_sheet.sheets);
        report.warnings.extend(report_sheet.warnings);
    }

    let bytes = writer.close()?;
    tracing::debug!(
        sheet = sheet_name,
        rows = df.height(),
        size = bytes.len(),
        "styled workbook exported"
    );
    Ok(SpecStyledWorkbook { bytes, report })
}
