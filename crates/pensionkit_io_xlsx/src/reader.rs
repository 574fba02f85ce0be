//! Worksheet reader that loads one sheet of an uploaded workbook into a DataFrame.
//!
//! The first row of the used range is the header. Column dtypes are inferred
//! from the body cells:
//! - all numbers, all integral -> `Int64`
//! - all numbers              -> `Float64`
//! - all dates                -> `Date`
//! - dates with a time of day  -> `Datetime[ms]` (date-only cells at midnight)
//! - anything else            -> `String`
//!
//! Blank cells become nulls in every dtype.

use std::io::{Cursor, Read};

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::{Column, DataFrame, NamedFrom, PolarsResult, Series};

use crate::spec::{EnumCellValue, XlsxIoError};
use crate::util::{
    build_date_column, build_datetime_column, derive_unique_column_names, render_number_text,
};

/// Read `sheet_name` from a workbook stream (xlsx/xls/xlsb/ods).
///
/// The stream is drained into memory first; it is dropped before returning.
pub fn read_sheet<R: Read>(mut source: R, sheet_name: &str) -> Result<DataFrame, XlsxIoError> {
    let mut v_bytes = Vec::new();
    source.read_to_end(&mut v_bytes)?;
    read_sheet_from_bytes(&v_bytes, sheet_name)
}

/// Read `sheet_name` from in-memory workbook bytes.
pub fn read_sheet_from_bytes(v_bytes: &[u8], sheet_name: &str) -> Result<DataFrame, XlsxIoError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(v_bytes))
        .map_err(|err| XlsxIoError::WorkbookUnreadable(err.to_string()))?;

    if !workbook.sheet_names().iter().any(|name| name == sheet_name) {
        return Err(XlsxIoError::SheetNotFound(sheet_name.to_string()));
    }

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|err| XlsxIoError::WorkbookUnreadable(err.to_string()))?;

    let mut iter_rows = range.rows();
    let Some(row_header) = iter_rows.next() else {
        tracing::debug!(sheet = sheet_name, "worksheet is empty");
        return Ok(DataFrame::empty());
    };

    let l_headers_raw: Vec<String> = row_header.iter().map(derive_header_text).collect();
    let l_colnames = derive_unique_column_names(&l_headers_raw);
    let n_width = l_colnames.len();

    let mut l_values_by_col: Vec<Vec<EnumCellValue>> = vec![Vec::new(); n_width];
    for row in iter_rows {
        for (n_idx_col, l_values) in l_values_by_col.iter_mut().enumerate() {
            let value = row
                .get(n_idx_col)
                .map_or(EnumCellValue::None, derive_cell_value_from_data);
            l_values.push(value);
        }
    }

    let l_cols = l_colnames
        .iter()
        .zip(l_values_by_col.iter())
        .map(|(c_name, l_values)| build_column_from_cell_values(c_name, l_values))
        .collect::<PolarsResult<Vec<_>>>()?;

    let df = DataFrame::new(l_cols)?;
    tracing::debug!(
        sheet = sheet_name,
        height = df.height(),
        width = df.width(),
        "worksheet loaded"
    );
    Ok(df)
}

fn derive_header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Float(val) => render_number_text(*val),
        _ => cell.to_string(),
    }
}

/// Map one calamine cell to the normalized cell model.
pub fn derive_cell_value_from_data(cell: &Data) -> EnumCellValue {
    match cell {
        Data::Empty | Data::Error(_) => EnumCellValue::None,
        Data::String(val) if val.is_empty() => EnumCellValue::None,
        Data::String(val) => EnumCellValue::String(val.clone()),
        Data::Float(val) => EnumCellValue::Number(*val),
        Data::Int(val) => EnumCellValue::Number(*val as f64),
        Data::Bool(val) => EnumCellValue::String(if *val { "True" } else { "False" }.to_string()),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                return EnumCellValue::Number(dt.as_f64());
            }
            match dt.as_datetime() {
                Some(ndt) if ndt.time() == NaiveTime::MIN => EnumCellValue::Date(ndt.date()),
                Some(ndt) => EnumCellValue::DateTime(ndt),
                None => EnumCellValue::Number(dt.as_f64()),
            }
        }
        Data::DateTimeIso(val) => {
            if let Ok(date) = NaiveDate::parse_from_str(val, "%Y-%m-%d") {
                return EnumCellValue::Date(date);
            }
            match NaiveDateTime::parse_from_str(val, "%Y-%m-%dT%H:%M:%S%.f") {
                Ok(ndt) => EnumCellValue::DateTime(ndt),
                Err(_) => EnumCellValue::String(val.clone()),
            }
        }
        Data::DurationIso(val) => EnumCellValue::String(val.clone()),
    }
}

/// Build a typed column from normalized cell values.
pub fn build_column_from_cell_values(
    name: &str,
    values: &[EnumCellValue],
) -> PolarsResult<Column> {
    let l_present: Vec<&EnumCellValue> = values
        .iter()
        .filter(|val| !matches!(val, EnumCellValue::None))
        .collect();

    let if_all_numbers = !l_present.is_empty()
        && l_present
            .iter()
            .all(|val| matches!(val, EnumCellValue::Number(_)));
    let if_all_temporal = !l_present.is_empty()
        && l_present
            .iter()
            .all(|val| matches!(val, EnumCellValue::Date(_) | EnumCellValue::DateTime(_)));
    let if_any_time = l_present
        .iter()
        .any(|val| matches!(val, EnumCellValue::DateTime(_)));

    if if_all_numbers {
        let l_numbers: Vec<Option<f64>> = values
            .iter()
            .map(|val| match val {
                EnumCellValue::Number(n) => Some(*n),
                _ => None,
            })
            .collect();
        let if_all_integral = l_numbers
            .iter()
            .flatten()
            .all(|n| n.fract() == 0.0 && n.abs() < 9.0e15);
        if if_all_integral {
            let l_ints: Vec<Option<i64>> = l_numbers.iter().map(|n| n.map(|v| v as i64)).collect();
            return Ok(Column::from(Series::new(name.into(), l_ints)));
        }
        return Ok(Column::from(Series::new(name.into(), l_numbers)));
    }

    if if_all_temporal && if_any_time {
        let l_datetimes: Vec<Option<NaiveDateTime>> = values
            .iter()
            .map(|val| match val {
                EnumCellValue::Date(date) => Some(date.and_time(NaiveTime::MIN)),
                EnumCellValue::DateTime(ndt) => Some(*ndt),
                _ => None,
            })
            .collect();
        return build_datetime_column(name, &l_datetimes);
    }

    if if_all_temporal {
        let l_dates: Vec<Option<NaiveDate>> = values
            .iter()
            .map(|val| match val {
                EnumCellValue::Date(date) => Some(*date),
                _ => None,
            })
            .collect();
        return build_date_column(name, &l_dates);
    }

    let l_texts: Vec<Option<String>> = values
        .iter()
        .map(|val| match val {
            EnumCellValue::None => None,
            EnumCellValue::String(s) => Some(s.clone()),
            EnumCellValue::Number(n) => Some(render_number_text(*n)),
            EnumCellValue::Date(date) => Some(date.format("%Y-%m-%d").to_string()),
            EnumCellValue::DateTime(ndt) => Some(ndt.format("%Y-%m-%d %H:%M:%S").to_string()),
        })
        .collect();
    Ok(Column::from(Series::new(name.into(), l_texts)))
}
