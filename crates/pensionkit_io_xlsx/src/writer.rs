//! XLSX writer kernel that converts DataFrames into in-memory workbook bytes.

use std::collections::BTreeMap;

use chrono::Datelike;
use polars::prelude::{AnyValue, DataFrame, DataType};
use rust_xlsxwriter::{
    ConditionalFormatCell, ConditionalFormatCellRule, ExcelDateTime, Format, FormatAlign,
    FormatBorder, Workbook, Worksheet,
};

use crate::conf::{N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX};
use crate::spec::{
    EnumAutofitColumnsRule, EnumCellValue, SpecAutofitCellsPolicy, SpecCellFormat,
    SpecConditionalTextRule, SpecSheetWritten, SpecXlsxFormatPresets, SpecXlsxReport,
    XlsxIoError,
};
use crate::util::{
    convert_datetime_to_excel_serial, convert_epoch_days_to_date, convert_timestamp_to_datetime,
    normalize_cell_value, render_number_text, sanitize_sheet_name, validate_unique_columns,
};

/// Per-sheet call options.
///
/// The header row is always frozen; missing values are written as blanks.
#[derive(Default, Debug, Clone)]
pub struct SpecXlsxSheetWriteOptions {
    /// Column autofit policy.
    pub policy_autofit: SpecAutofitCellsPolicy,
    /// Header format patches keyed by column name, merged over the header preset.
    pub cols_fmt_header_overrides: BTreeMap<String, SpecCellFormat>,
    /// Exact-text conditional rules keyed by column name, registered in order.
    pub cols_rules_conditional: BTreeMap<String, Vec<SpecConditionalTextRule>>,
}

/// Stateful workbook writer.
///
/// Sheets accumulate in memory; [`Self::close`] serializes the workbook.
/// Sheet names must be unique within one writer.
pub struct XlsxWriter {
    workbook: Workbook,
    fmts: SpecXlsxFormatPresets,
    l_reports: Vec<SpecXlsxReport>,
}

impl Default for XlsxWriter {
    fn default() -> Self {
        Self {
            workbook: Workbook::new(),
            fmts: SpecXlsxFormatPresets::default(),
            l_reports: Vec::new(),
        }
    }
}

impl XlsxWriter {
    /// Return immutable snapshot of per-sheet write reports.
    pub fn report(&self) -> Vec<SpecXlsxReport> {
        self.l_reports.clone()
    }

    /// Serialize the workbook into a self-contained xlsx byte buffer.
    pub fn close(mut self) -> Result<Vec<u8>, XlsxIoError> {
        Ok(self.workbook.save_to_buffer()?)
    }

    /// Write one sheet from an in-memory dataframe.
    pub fn write_sheet_from_dataframe(
        &mut self,
        df_data: &DataFrame,
        sheet_name: &str,
        options: &SpecXlsxSheetWriteOptions,
    ) -> Result<(), XlsxIoError> {
        validate_policy_autofit(&options.policy_autofit)?;

        let l_colnames_df: Vec<String> = df_data
            .get_column_names_str()
            .into_iter()
            .map(ToString::to_string)
            .collect();
        validate_unique_columns(&l_colnames_df)?;

        let n_width_df = l_colnames_df.len();
        let n_height_df = df_data.height();
        if n_width_df > N_NCOLS_EXCEL_MAX || n_height_df + 1 > N_NROWS_EXCEL_MAX {
            return Err(XlsxIoError::InvalidData(format!(
                "DataFrame shape ({n_height_df}, {n_width_df}) exceeds one worksheet."
            )));
        }

        for c_name in options
            .cols_fmt_header_overrides
            .keys()
            .chain(options.cols_rules_conditional.keys())
        {
            if !l_colnames_df.contains(c_name) {
                return Err(XlsxIoError::InvalidData(format!(
                    "Column not found: {c_name:?}"
                )));
            }
        }

        let l_cols_idx_numeric = derive_numeric_column_indices(df_data);
        let l_cols_idx_integer = derive_integer_column_indices(df_data, &l_cols_idx_numeric);
        let l_cols_idx_date = derive_date_column_indices(df_data);
        let l_cols_idx_datetime = derive_datetime_column_indices(df_data);

        let mut report = SpecXlsxReport::default();
        let c_sheet_name_clean = sanitize_sheet_name(sheet_name, "_");
        if c_sheet_name_clean != sheet_name {
            report.warn(format!(
                "Sheet name {sheet_name:?} sanitized to {c_sheet_name_clean:?}."
            ));
        }

        let l_fmt_data_by_col: Vec<Format> = plan_column_formats(
            n_width_df,
            &l_cols_idx_numeric,
            &l_cols_idx_integer,
            &l_cols_idx_date,
            &l_cols_idx_datetime,
            &self.fmts,
        )
        .iter()
        .map(derive_rust_xlsx_format)
        .collect();
        let l_fmt_header_by_col: Vec<Format> = l_colnames_df
            .iter()
            .map(|c_name| match options.cols_fmt_header_overrides.get(c_name) {
                Some(fmt_override) => derive_rust_xlsx_format(&self.fmts.header.merge(fmt_override)),
                None => derive_rust_xlsx_format(&self.fmts.header),
            })
            .collect();

        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(&c_sheet_name_clean)?;

        write_header(worksheet, &l_colnames_df, &l_fmt_header_by_col)?;
        worksheet.set_freeze_panes(1, 0)?;

        let if_autofit_columns = !matches!(
            options.policy_autofit.rule_columns,
            EnumAutofitColumnsRule::None
        );
        let if_autofit_body = matches!(
            options.policy_autofit.rule_columns,
            EnumAutofitColumnsRule::All
        );

        let mut l_width_by_col_body = vec![0usize; n_width_df];
        for (n_idx_col, col) in df_data.get_columns().iter().enumerate() {
            for n_idx_row in 0..n_height_df {
                let value =
                    normalize_cell_value(derive_cell_value_from_any_value(col.get(n_idx_row)?));

                if if_autofit_body {
                    l_width_by_col_body[n_idx_col] =
                        usize::max(l_width_by_col_body[n_idx_col], estimate_width_len(&value));
                }

                write_cell_with_format(
                    worksheet,
                    n_idx_row + 1,
                    n_idx_col,
                    &value,
                    &l_fmt_data_by_col[n_idx_col],
                )?;
            }
        }

        let mut cnt_rules_conditional = 0usize;
        if n_height_df > 0 {
            for (c_name, l_rules) in &options.cols_rules_conditional {
                let Some(n_idx_col) = l_colnames_df.iter().position(|c| c == c_name) else {
                    continue;
                };
                for rule in l_rules {
                    // String criteria are quoted by rust_xlsxwriter.
                    let conditional_format = ConditionalFormatCell::new()
                        .set_rule(ConditionalFormatCellRule::EqualTo(rule.text.as_str()))
                        .set_format(derive_rust_xlsx_format(&rule.fmt));
                    worksheet.add_conditional_format(
                        1,
                        cast_col_num(n_idx_col)?,
                        cast_row_num(n_height_df)?,
                        cast_col_num(n_idx_col)?,
                        &conditional_format,
                    )?;
                    cnt_rules_conditional += 1;
                }
            }
        }

        if if_autofit_columns {
            let n_min = usize::max(1, options.policy_autofit.width_cell_min);
            let n_max = usize::min(
                255,
                usize::max(n_min, options.policy_autofit.width_cell_max),
            );
            let n_pad = options.policy_autofit.width_cell_padding;

            for (n_idx_col, c_name) in l_colnames_df.iter().enumerate() {
                let n_width_header = estimate_unicode_string_width(c_name);
                let n_width_recorded =
                    usize::max(n_width_header, l_width_by_col_body[n_idx_col]);
                let n_width_final = usize::min(n_max, usize::max(n_min, n_width_recorded + n_pad));
                worksheet.set_column_width(cast_col_num(n_idx_col)?, n_width_final as f64)?;
            }
        }

        tracing::debug!(
            sheet = c_sheet_name_clean.as_str(),
            height = n_height_df,
            width = n_width_df,
            rules = cnt_rules_conditional,
            "worksheet written"
        );

        report.sheets.push(SpecSheetWritten {
            sheet_name: c_sheet_name_clean,
            height_data: n_height_df,
            width_data: n_width_df,
            cnt_rules_conditional,
        });
        self.l_reports.push(report);
        Ok(())
    }
}

/// Estimate displayed width units for one normalized cell value.
pub fn estimate_width_len(value: &EnumCellValue) -> usize {
    match value {
        EnumCellValue::None => 0,
        EnumCellValue::String(s) => estimate_unicode_string_width(s),
        EnumCellValue::Number(n) => render_number_text(*n).len(),
        EnumCellValue::Date(_) => 10,
        EnumCellValue::DateTime(_) => 19,
    }
}

fn estimate_unicode_string_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = s.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii as f64 * 1.6).round() as usize
}

/// Pick the body preset of every column: temporal, then integer, then decimal, then text.
pub fn plan_column_formats(
    width_data: usize,
    cols_idx_numeric: &[usize],
    cols_idx_integer: &[usize],
    cols_idx_date: &[usize],
    cols_idx_datetime: &[usize],
    fmts: &SpecXlsxFormatPresets,
) -> Vec<SpecCellFormat> {
    (0..width_data)
        .map(|col_idx| {
            let fmt_base = if cols_idx_date.contains(&col_idx) {
                &fmts.date
            } else if cols_idx_datetime.contains(&col_idx) {
                &fmts.datetime
            } else if cols_idx_integer.contains(&col_idx) {
                &fmts.integer
            } else if cols_idx_numeric.contains(&col_idx) {
                &fmts.decimal
            } else {
                &fmts.text
            };
            fmt_base.clone()
        })
        .collect()
}

fn validate_policy_autofit(policy_autofit: &SpecAutofitCellsPolicy) -> Result<(), XlsxIoError> {
    if policy_autofit.width_cell_min == 0 {
        return Err(XlsxIoError::InvalidData(
            "policy_autofit.width_cell_min must be >= 1.".to_string(),
        ));
    }
    if policy_autofit.width_cell_max < policy_autofit.width_cell_min {
        return Err(XlsxIoError::InvalidData(
            "policy_autofit.width_cell_max must be >= policy_autofit.width_cell_min.".to_string(),
        ));
    }
    Ok(())
}

fn derive_numeric_column_indices(df: &DataFrame) -> Vec<usize> {
    df.get_columns()
        .iter()
        .enumerate()
        .filter_map(|(n_idx, c_col)| c_col.dtype().is_numeric().then_some(n_idx))
        .collect()
}

fn derive_integer_column_indices(df: &DataFrame, cols_idx_numeric: &[usize]) -> Vec<usize> {
    cols_idx_numeric
        .iter()
        .copied()
        .filter(|n_idx| df.get_columns()[*n_idx].dtype().is_integer())
        .collect()
}

fn derive_date_column_indices(df: &DataFrame) -> Vec<usize> {
    df.get_columns()
        .iter()
        .enumerate()
        .filter_map(|(n_idx, c_col)| matches!(c_col.dtype(), DataType::Date).then_some(n_idx))
        .collect()
}

fn derive_datetime_column_indices(df: &DataFrame) -> Vec<usize> {
    df.get_columns()
        .iter()
        .enumerate()
        .filter_map(|(n_idx, c_col)| {
            matches!(c_col.dtype(), DataType::Datetime(_, _)).then_some(n_idx)
        })
        .collect()
}

fn derive_cell_value_from_any_value(value: AnyValue<'_>) -> EnumCellValue {
    match value {
        AnyValue::Null => EnumCellValue::None,
        AnyValue::String(val) => EnumCellValue::String(val.to_string()),
        AnyValue::StringOwned(val) => EnumCellValue::String(val.to_string()),
        AnyValue::Boolean(val) => {
            EnumCellValue::String(if val { "True" } else { "False" }.to_string())
        }
        AnyValue::Date(n_days) => match convert_epoch_days_to_date(n_days) {
            Some(date) => EnumCellValue::Date(date),
            None => EnumCellValue::None,
        },
        AnyValue::Datetime(n_value, time_unit, _) => {
            match convert_timestamp_to_datetime(n_value, time_unit) {
                Some(ndt) => EnumCellValue::DateTime(ndt),
                None => EnumCellValue::None,
            }
        }
        AnyValue::DatetimeOwned(n_value, time_unit, _) => {
            match convert_timestamp_to_datetime(n_value, time_unit) {
                Some(ndt) => EnumCellValue::DateTime(ndt),
                None => EnumCellValue::None,
            }
        }
        AnyValue::UInt8(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt16(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt32(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int8(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int16(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Float32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Float64(val) => EnumCellValue::Number(val),
        _ => EnumCellValue::String(value.to_string()),
    }
}

fn write_header(
    worksheet: &mut Worksheet,
    colnames: &[String],
    fmts_header: &[Format],
) -> Result<(), XlsxIoError> {
    for (col_idx, (c_name, fmt_header)) in colnames.iter().zip(fmts_header).enumerate() {
        if c_name.is_empty() {
            worksheet.write_blank(0, cast_col_num(col_idx)?, fmt_header)?;
        } else {
            worksheet.write_string_with_format(0, cast_col_num(col_idx)?, c_name, fmt_header)?;
        }
    }
    Ok(())
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), XlsxIoError> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;
    match value {
        EnumCellValue::None => {
            worksheet.write_blank(n_row, n_col, format)?;
        }
        EnumCellValue::String(val) => {
            worksheet.write_string_with_format(n_row, n_col, val, format)?;
        }
        EnumCellValue::Number(val) => {
            worksheet.write_number_with_format(n_row, n_col, *val, format)?;
        }
        EnumCellValue::Date(date) => {
            // Excel cannot represent dates before 1900; keep them as text.
            let datetime = u16::try_from(date.year())
                .ok()
                .and_then(|year| {
                    ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8).ok()
                });
            match datetime {
                Some(datetime) => {
                    worksheet.write_datetime_with_format(n_row, n_col, &datetime, format)?;
                }
                None => {
                    worksheet.write_string(n_row, n_col, date.format("%Y-%m-%d").to_string())?;
                }
            }
        }
        EnumCellValue::DateTime(ndt) => {
            let datetime = convert_datetime_to_excel_serial(*ndt)
                .and_then(|n_serial| ExcelDateTime::from_serial_datetime(n_serial).ok());
            match datetime {
                Some(datetime) => {
                    worksheet.write_datetime_with_format(n_row, n_col, &datetime, format)?;
                }
                None => {
                    worksheet.write_string(
                        n_row,
                        n_col,
                        ndt.format("%Y-%m-%d %H:%M:%S").to_string(),
                    )?;
                }
            }
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.italic.unwrap_or(false) {
        format = format.set_italic();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }
    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        7 => FormatBorder::Hair,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

fn cast_row_num(value: usize) -> Result<u32, XlsxIoError> {
    u32::try_from(value)
        .map_err(|_| XlsxIoError::InvalidData(format!("row index overflow: {value}")))
}

fn cast_col_num(value: usize) -> Result<u16, XlsxIoError> {
    u16::try_from(value)
        .map_err(|_| XlsxIoError::InvalidData(format!("column index overflow: {value}")))
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use calamine::{Data, Reader, Xlsx};
    use chrono::NaiveDate;
    use polars::prelude::{Column, NamedFrom, Series};
    use zip::ZipArchive;

    use super::*;
    use crate::util::convert_date_to_epoch_days;

    fn create_frame() -> DataFrame {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        DataFrame::new(vec![
            Column::from(Series::new("CASO".into(), &[Some("A-1"), None])),
            Column::from(Series::new("DIAS".into(), &[Some(12i64), Some(-3)])),
            Column::from(
                Series::new("FECHA".into(), &[Some(convert_date_to_epoch_days(date)), None])
                    .cast(&DataType::Date)
                    .unwrap(),
            ),
            Column::from(Series::new("ESTADO".into(), &["ROJO", "AZUL"])),
        ])
        .unwrap()
    }

    fn create_options_with_rules() -> SpecXlsxSheetWriteOptions {
        let mut options = SpecXlsxSheetWriteOptions::default();
        options.cols_fmt_header_overrides.insert(
            "ESTADO".to_string(),
            SpecCellFormat {
                bg_color: Some("#5A6772".to_string()),
                font_color: Some("#FFFFFF".to_string()),
                ..Default::default()
            },
        );
        options.cols_rules_conditional.insert(
            "ESTADO".to_string(),
            vec![
                SpecConditionalTextRule {
                    text: "ROJO".to_string(),
                    fmt: SpecCellFormat {
                        bg_color: Some("#FF6961".to_string()),
                        ..Default::default()
                    },
                },
                SpecConditionalTextRule {
                    text: "AZUL".to_string(),
                    fmt: SpecCellFormat {
                        bg_color: Some("#9BC2E6".to_string()),
                        ..Default::default()
                    },
                },
            ],
        );
        options
    }

    #[test]
    fn test_write_sheet_values_survive_reread() {
        let mut writer = XlsxWriter::default();
        writer
            .write_sheet_from_dataframe(&create_frame(), "DATOS", &create_options_with_rules())
            .unwrap();
        let v_bytes = writer.close().unwrap();

        let mut workbook = Xlsx::new(Cursor::new(v_bytes)).unwrap();
        let range = workbook.worksheet_range("DATOS").unwrap();

        assert_eq!(range.get_size(), (3, 4));
        assert_eq!(range.get((0, 3)), Some(&Data::String("ESTADO".to_string())));
        assert_eq!(range.get((1, 0)), Some(&Data::String("A-1".to_string())));
        assert_eq!(range.get((1, 1)), Some(&Data::Float(12.0)));
        assert_eq!(range.get((2, 1)), Some(&Data::Float(-3.0)));
        assert_eq!(range.get((1, 3)), Some(&Data::String("ROJO".to_string())));
        assert_eq!(range.get((2, 3)), Some(&Data::String("AZUL".to_string())));

        let Some(Data::DateTime(dt)) = range.get((1, 2)) else {
            panic!("expected a date cell");
        };
        assert_eq!(
            dt.as_datetime().map(|ndt| ndt.date()),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn test_write_sheet_reports_conditional_rules() {
        let mut writer = XlsxWriter::default();
        writer
            .write_sheet_from_dataframe(&create_frame(), "DATOS", &create_options_with_rules())
            .unwrap();

        let l_reports = writer.report();
        assert_eq!(l_reports.len(), 1);
        assert_eq!(
            l_reports[0].sheets,
            vec![SpecSheetWritten {
                sheet_name: "DATOS".to_string(),
                height_data: 2,
                width_data: 4,
                cnt_rules_conditional: 2,
            }]
        );
    }

    #[test]
    fn test_write_sheet_empty_frame_has_header_only() {
        let df = create_frame().head(Some(0));
        let mut writer = XlsxWriter::default();
        writer
            .write_sheet_from_dataframe(&df, "VACIO", &create_options_with_rules())
            .unwrap();
        assert_eq!(writer.report()[0].sheets[0].cnt_rules_conditional, 0);

        let v_bytes = writer.close().unwrap();
        let mut workbook = Xlsx::new(Cursor::new(v_bytes)).unwrap();
        let range = workbook.worksheet_range("VACIO").unwrap();
        assert_eq!(range.get_size(), (1, 4));
    }

    #[test]
    fn test_write_sheet_rejects_unknown_rule_column() {
        let mut options = SpecXlsxSheetWriteOptions::default();
        options
            .cols_rules_conditional
            .insert("NO_EXISTE".to_string(), vec![]);

        let mut writer = XlsxWriter::default();
        let err = writer
            .write_sheet_from_dataframe(&create_frame(), "DATOS", &options)
            .unwrap_err();
        assert!(err.to_string().contains("NO_EXISTE"));
    }

    #[test]
    fn test_write_sheet_freezes_header_and_blanks_non_finite_numbers() {
        let df = DataFrame::new(vec![
            Column::from(Series::new("CASO".into(), &["A-1", "A-2"])),
            Column::from(Series::new("MONTO".into(), &[f64::NAN, 1.5])),
        ])
        .unwrap();
        let mut writer = XlsxWriter::default();
        writer
            .write_sheet_from_dataframe(&df, "DATOS", &SpecXlsxSheetWriteOptions::default())
            .unwrap();
        let v_bytes = writer.close().unwrap();

        let mut c_sheet = String::new();
        ZipArchive::new(Cursor::new(v_bytes.clone()))
            .unwrap()
            .by_name("xl/worksheets/sheet1.xml")
            .unwrap()
            .read_to_string(&mut c_sheet)
            .unwrap();
        assert!(c_sheet.contains(r#"ySplit="1""#));
        assert!(c_sheet.contains(r#"state="frozen""#));
        assert!(!c_sheet.contains("xSplit"));

        let mut workbook = Xlsx::new(Cursor::new(v_bytes)).unwrap();
        let range = workbook.worksheet_range("DATOS").unwrap();
        assert_eq!(range.get((1, 1)), Some(&Data::Empty));
        assert_eq!(range.get((2, 1)), Some(&Data::Float(1.5)));
    }

    #[test]
    fn test_write_sheet_keeps_datetime_cells() {
        let ndt = NaiveDate::from_ymd_opt(2023, 3, 15)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let df = DataFrame::new(vec![
            crate::util::build_datetime_column("ATENCION", &[Some(ndt), None]).unwrap(),
        ])
        .unwrap();
        let mut writer = XlsxWriter::default();
        writer
            .write_sheet_from_dataframe(&df, "DATOS", &SpecXlsxSheetWriteOptions::default())
            .unwrap();

        let mut workbook = Xlsx::new(Cursor::new(writer.close().unwrap())).unwrap();
        let range = workbook.worksheet_range("DATOS").unwrap();
        let Some(Data::DateTime(dt)) = range.get((1, 0)) else {
            panic!("expected a datetime cell");
        };
        assert_eq!(dt.as_datetime(), Some(ndt));
        assert_eq!(range.get((2, 0)), Some(&Data::Empty));
    }

    #[test]
    fn test_plan_column_formats_prefers_date_then_integer() {
        let fmts = SpecXlsxFormatPresets::default();
        let l_fmts = plan_column_formats(5, &[1, 2], &[1], &[3], &[4], &fmts);
        assert_eq!(l_fmts[0], fmts.text);
        assert_eq!(l_fmts[1], fmts.integer);
        assert_eq!(l_fmts[2], fmts.decimal);
        assert_eq!(l_fmts[3], fmts.date);
        assert_eq!(l_fmts[4], fmts.datetime);
    }
}
