//! Stateless helper utilities used by the reader and writer kernels.

use std::collections::{BTreeMap, BTreeSet};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::{
    Column, DataFrame, DataType, IpcWriter, NamedFrom, PolarsResult, SerWriter, Series,
    TimeUnit,
};

use crate::conf::{N_EXCEL_SERIAL_MAX, N_LEN_EXCEL_SHEET_NAME_MAX, TUP_EXCEL_ILLEGAL};
use crate::spec::{EnumCellValue, XlsxIoError};

////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Blank out missing and non-finite values; everything else is written as-is.
pub fn normalize_cell_value(value: EnumCellValue) -> EnumCellValue {
    match value {
        EnumCellValue::Number(n) if !n.is_finite() => EnumCellValue::None,
        _ => value,
    }
}

/// Render a number the way a spreadsheet shows it in a General cell.
pub fn render_number_text(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DateConversion

/// Convert a date to days since 1970-01-01 (polars `Date` physical value).
pub fn convert_date_to_epoch_days(date: NaiveDate) -> i32 {
    (date - NaiveDate::default()).num_days() as i32
}

/// Convert days since 1970-01-01 back to a date.
pub fn convert_epoch_days_to_date(n_days: i32) -> Option<NaiveDate> {
    NaiveDate::default().checked_add_signed(Duration::days(i64::from(n_days)))
}

/// Convert an Excel serial day number (1900 system) to a date.
///
/// Fractional parts (time of day) are dropped. Values outside the Excel date
/// range yield `None`.
pub fn convert_excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > N_EXCEL_SERIAL_MAX {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?
        .checked_add_signed(Duration::days(serial.trunc() as i64))
}

/// Convert a polars `Datetime` physical value to a naive timestamp.
pub fn convert_timestamp_to_datetime(n_value: i64, time_unit: TimeUnit) -> Option<NaiveDateTime> {
    let delta = match time_unit {
        TimeUnit::Milliseconds => Duration::try_milliseconds(n_value)?,
        TimeUnit::Microseconds => Duration::microseconds(n_value),
        TimeUnit::Nanoseconds => Duration::nanoseconds(n_value),
    };
    NaiveDate::default()
        .and_time(NaiveTime::MIN)
        .checked_add_signed(delta)
}

/// Convert a timestamp to an Excel serial (1900 system), day fraction included.
///
/// Only timestamps from 1900-03-01 on are representable.
pub fn convert_datetime_to_excel_serial(ndt: NaiveDateTime) -> Option<f64> {
    let ndt_epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    let n_serial = (ndt - ndt_epoch).num_milliseconds() as f64 / 86_400_000.0;
    (61.0..N_EXCEL_SERIAL_MAX + 1.0)
        .contains(&n_serial)
        .then_some(n_serial)
}

/// Build a nullable polars `Date` column.
pub fn build_date_column(name: &str, dates: &[Option<NaiveDate>]) -> PolarsResult<Column> {
    let l_days: Vec<Option<i32>> = dates
        .iter()
        .map(|date| date.map(convert_date_to_epoch_days))
        .collect();
    Ok(Column::from(
        Series::new(name.into(), l_days).cast(&DataType::Date)?,
    ))
}

/// Build a nullable millisecond polars `Datetime` column.
pub fn build_datetime_column(
    name: &str,
    datetimes: &[Option<NaiveDateTime>],
) -> PolarsResult<Column> {
    let ndt_epoch = NaiveDate::default().and_time(NaiveTime::MIN);
    let l_millis: Vec<Option<i64>> = datetimes
        .iter()
        .map(|ndt| ndt.map(|ndt| (ndt - ndt_epoch).num_milliseconds()))
        .collect();
    Ok(Column::from(
        Series::new(name.into(), l_millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?,
    ))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DataFrameLikeUtils

/// Validate that `columns` has no duplicated names.
pub fn validate_unique_columns(columns: &[String]) -> Result<(), XlsxIoError> {
    if columns.len() == columns.iter().collect::<BTreeSet<_>>().len() {
        return Ok(());
    }

    let mut dict_pos: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (n_idx, c_name) in columns.iter().enumerate() {
        dict_pos.entry(c_name).or_default().push(n_idx);
    }

    let c_msg = dict_pos
        .iter()
        .filter_map(|(c_name, l_pos)| {
            if l_pos.len() > 1 {
                Some(format!(
                    "{c_name:?} x{} at indices {:?}",
                    l_pos.len(),
                    l_pos
                ))
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join("; ");

    Err(XlsxIoError::InvalidData(format!(
        "Duplicate column names detected: {c_msg}"
    )))
}

/// Turn raw header texts into unique column names.
///
/// Blank headers become `Unnamed: {idx}`; repeats get `.1`, `.2`, ... suffixes.
pub fn derive_unique_column_names(headers_raw: &[String]) -> Vec<String> {
    let mut set_names_taken: BTreeSet<String> = BTreeSet::new();
    let mut l_names = Vec::with_capacity(headers_raw.len());

    for (n_idx, c_header) in headers_raw.iter().enumerate() {
        let c_base = if c_header.trim().is_empty() {
            format!("Unnamed: {n_idx}")
        } else {
            c_header.clone()
        };

        let mut c_name = c_base.clone();
        let mut n_dup = 1usize;
        while set_names_taken.contains(&c_name) {
            c_name = format!("{c_base}.{n_dup}");
            n_dup += 1;
        }
        set_names_taken.insert(c_name.clone());
        l_names.push(c_name);
    }

    l_names
}

/// Serialize a DataFrame to Arrow IPC bytes.
pub fn convert_dataframe_to_ipc_bytes(df: &DataFrame) -> Result<Vec<u8>, XlsxIoError> {
    let mut df_owned = df.clone();
    let mut v_buffer = Vec::new();
    IpcWriter::new(&mut v_buffer).finish(&mut df_owned)?;
    Ok(v_buffer)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
