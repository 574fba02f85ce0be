//! Review-date coercion and expiry classification.

use chrono::{Datelike, Months, NaiveDate, NaiveTime};
use pensionkit_io_xlsx::{
    build_date_column, convert_epoch_days_to_date, convert_excel_serial_to_date,
    convert_timestamp_to_datetime,
};
use polars::prelude::{AnyValue, Column, DataFrame, NamedFrom, PolarsResult, Series};

use crate::conf::{
    C_COL_ALERT, C_COL_DAYS_REMAINING, C_COL_EXPIRY_DATE, C_COL_REVIEW_DATE, C_SHEET_REVIEW,
    N_MONTHS_REVIEW_VALIDITY, TUP_REVIEW_DATE_FORMATS, TUP_REVIEW_TIME_FORMATS,
};
use crate::report::ReportClassify;
use crate::spec::{EnumAlertCategory, EnumClassifyVariant, ReviewError};
use crate::util::validate_required_column;

////////////////////////////////////////////////////////////////////////////////
// #region ExpiryArithmetic

/// Review date plus the validity period; month-end dates clamp (29 Feb -> 28 Feb).
pub fn derive_expiry_date(date_review: NaiveDate) -> Option<NaiveDate> {
    date_review.checked_add_months(Months::new(N_MONTHS_REVIEW_VALIDITY))
}

/// Whole days from `date_today` to the expiry of `date_review`; negative once expired.
pub fn calculate_days_remaining(date_review: NaiveDate, date_today: NaiveDate) -> Option<i64> {
    derive_expiry_date(date_review).map(|date_expiry| (date_expiry - date_today).num_days())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DateCoercion

/// Parse a free-text review date; `None` when no known layout matches.
pub fn parse_review_date_text(text: &str) -> Option<NaiveDate> {
    let c_text = text.trim();
    if c_text.is_empty() {
        return None;
    }

    if let Some(date) = parse_review_date_part(c_text) {
        return Some(date);
    }

    // Trailing time of day, e.g. `2022-10-28T08:30` or `Oct 28, 2022 08:30`.
    let (c_date, c_time) = c_text.rsplit_once(['T', ' '])?;
    let if_time_valid = TUP_REVIEW_TIME_FORMATS
        .iter()
        .any(|c_fmt| NaiveTime::parse_from_str(c_time.trim(), c_fmt).is_ok());
    if !if_time_valid {
        return None;
    }
    parse_review_date_part(c_date.trim())
}

fn parse_review_date_part(c_date: &str) -> Option<NaiveDate> {
    TUP_REVIEW_DATE_FORMATS.iter().find_map(|c_fmt| {
        NaiveDate::parse_from_str(c_date, c_fmt)
            .ok()
            .filter(|date| date.year() >= 1000)
    })
}

fn derive_review_date_from_any_value(value: AnyValue<'_>) -> Option<NaiveDate> {
    match value {
        AnyValue::Date(n_days) => convert_epoch_days_to_date(n_days),
        AnyValue::Datetime(n_value, time_unit, _) => {
            convert_timestamp_to_datetime(n_value, time_unit).map(|ndt| ndt.date())
        }
        AnyValue::DatetimeOwned(n_value, time_unit, _) => {
            convert_timestamp_to_datetime(n_value, time_unit).map(|ndt| ndt.date())
        }
        AnyValue::String(val) => parse_review_date_text(val),
        AnyValue::StringOwned(val) => parse_review_date_text(val.as_str()),
        AnyValue::Int8(val) => convert_excel_serial_to_date(f64::from(val)),
        AnyValue::Int16(val) => convert_excel_serial_to_date(f64::from(val)),
        AnyValue::Int32(val) => convert_excel_serial_to_date(f64::from(val)),
        AnyValue::Int64(val) => convert_excel_serial_to_date(val as f64),
        AnyValue::UInt8(val) => convert_excel_serial_to_date(f64::from(val)),
        AnyValue::UInt16(val) => convert_excel_serial_to_date(f64::from(val)),
        AnyValue::UInt32(val) => convert_excel_serial_to_date(f64::from(val)),
        AnyValue::UInt64(val) => convert_excel_serial_to_date(val as f64),
        AnyValue::Float32(val) => convert_excel_serial_to_date(f64::from(val)),
        AnyValue::Float64(val) => convert_excel_serial_to_date(val),
        _ => None,
    }
}

/// Coerce a review-date column of any dtype into optional dates.
///
/// Dates pass through and datetimes keep their date part. Numbers are Excel
/// serials and text is parsed; anything else becomes `None`.
pub fn coerce_review_dates(col: &Column) -> PolarsResult<Vec<Option<NaiveDate>>> {
    (0..col.len())
        .map(|n_idx| col.get(n_idx).map(derive_review_date_from_any_value))
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Classification

/// Classify every row of a review table against `date_today`.
///
/// The review-date column is rewritten as a `Date` column. The category label
/// is appended (or replaced in place) as [`C_COL_ALERT`]; the extended variant
/// also keeps expiry date and remaining days.
pub fn classify_review_table(
    mut df: DataFrame,
    variant: EnumClassifyVariant,
    date_today: NaiveDate,
) -> Result<(DataFrame, ReportClassify), ReviewError> {
    validate_required_column(&df, C_COL_REVIEW_DATE, C_SHEET_REVIEW)?;

    let l_dates_review = coerce_review_dates(df.column(C_COL_REVIEW_DATE)?)?;
    let l_dates_expiry: Vec<Option<NaiveDate>> = l_dates_review
        .iter()
        .map(|date| date.and_then(derive_expiry_date))
        .collect();
    let l_days_remaining: Vec<Option<i64>> = l_dates_expiry
        .iter()
        .map(|date| date.map(|date_expiry| (date_expiry - date_today).num_days()))
        .collect();

    let mut report = ReportClassify::default();
    let l_labels: Vec<&str> = l_days_remaining
        .iter()
        .map(|n_days| {
            let category = EnumAlertCategory::from_days_remaining(*n_days);
            report.add(category);
            category.as_label()
        })
        .collect();

    let n_unparsed = l_dates_review.iter().filter(|date| date.is_none()).count();
    if n_unparsed > 0 {
        tracing::debug!(
            rows = n_unparsed,
            column = C_COL_REVIEW_DATE,
            "review dates missing or unparseable"
        );
    }

    df.with_column(build_date_column(C_COL_REVIEW_DATE, &l_dates_review)?)?;
    if variant == EnumClassifyVariant::Extended {
        df.with_column(build_date_column(C_COL_EXPIRY_DATE, &l_dates_expiry)?)?;
        df.with_column(Series::new(C_COL_DAYS_REMAINING.into(), l_days_remaining))?;
    }
    df.with_column(Series::new(C_COL_ALERT.into(), l_labels))?;

    Ok((df, report))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use pensionkit_io_xlsx::build_datetime_column;
    use polars::prelude::DataType;
    use pretty_assertions::assert_eq;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn date_today() -> NaiveDate {
        date(2025, 10, 18)
    }

    fn derive_labels(df: &DataFrame) -> Vec<Option<String>> {
        df.column(C_COL_ALERT)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|val| val.map(ToString::to_string))
            .collect()
    }

    fn create_review_frame(dates: &[Option<NaiveDate>]) -> DataFrame {
        let l_cases: Vec<String> = (1..=dates.len()).map(|n| format!("C-{n}")).collect();
        DataFrame::new(vec![
            Column::from(Series::new("CASO".into(), l_cases)),
            build_date_column(C_COL_REVIEW_DATE, dates).unwrap(),
            Column::from(Series::new(
                "NOMBRE".into(),
                vec!["Ana"; dates.len()],
            )),
        ])
        .unwrap()
    }

    #[test]
    fn test_expiry_date_clamps_leap_day() {
        assert_eq!(derive_expiry_date(date(2024, 2, 29)), Some(date(2027, 2, 28)));
        assert_eq!(derive_expiry_date(date(2022, 10, 28)), Some(date(2025, 10, 28)));
    }

    #[test]
    fn test_days_remaining_boundaries_map_to_expected_categories() {
        let l_cases = [
            (15, EnumAlertCategory::RedAlert),
            (16, EnumAlertCategory::YellowAlert),
            (30, EnumAlertCategory::YellowAlert),
            (31, EnumAlertCategory::GreenAlert),
            (90, EnumAlertCategory::GreenAlert),
            (91, EnumAlertCategory::OnTerm),
        ];
        for (n_days, category) in l_cases {
            let date_review = (date_today() + chrono::Duration::days(n_days))
                .checked_sub_months(Months::new(N_MONTHS_REVIEW_VALIDITY))
                .unwrap();
            let n_remaining = calculate_days_remaining(date_review, date_today());
            assert_eq!(n_remaining, Some(n_days));
            assert_eq!(EnumAlertCategory::from_days_remaining(n_remaining), category);
        }
    }

    #[test]
    fn test_parse_review_date_text_layouts() {
        let date_expected = date(2022, 10, 28);
        for c_text in [
            "2022-10-28",
            " 2022-10-28 ",
            "2022/10/28",
            "2022-10-28 08:30:00",
            "2022-10-28T08:30:00",
            "2022-10-28 08:30",
            "10/28/2022",
            "28/10/2022",
            "28.10.2022",
            "10/28/22",
            "28-Oct-2022",
            "28-OCT-2022",
            "Oct 28, 2022",
            "October 28, 2022",
            "28 Oct 2022",
            "20221028",
            "Oct 28, 2022 08:30",
            "28/10/2022 8:30",
        ] {
            assert_eq!(parse_review_date_text(c_text), Some(date_expected), "{c_text:?}");
        }

        assert_eq!(parse_review_date_text("05/03/2024"), Some(date(2024, 5, 3)));
        assert_eq!(parse_review_date_text(""), None);
        assert_eq!(parse_review_date_text("pendiente"), None);
        assert_eq!(parse_review_date_text("2022-10-28 mañana"), None);
        assert_eq!(parse_review_date_text("2022-02-30"), None);
        assert_eq!(parse_review_date_text("28 Okt 2022"), None);
        assert_eq!(parse_review_date_text("20221328"), None);
    }

    #[test]
    fn test_classify_basic_appends_only_alert_column() {
        let df = create_review_frame(&[
            Some(date(2022, 10, 28)),
            None,
            Some(date(2024, 2, 29)),
            Some(date(2020, 1, 1)),
        ]);

        let (df_out, report) =
            classify_review_table(df, EnumClassifyVariant::Basic, date_today()).unwrap();

        assert_eq!(
            df_out.get_column_names_str(),
            vec!["CASO", C_COL_REVIEW_DATE, "NOMBRE", C_COL_ALERT]
        );
        assert_eq!(
            derive_labels(&df_out),
            vec![
                Some("ALERTA ROJA".to_string()),
                Some("SIN FECHA".to_string()),
                Some("EN TÉRMINOS".to_string()),
                Some("ALERTA ROJA".to_string()),
            ]
        );
        assert_eq!(report.cnt_rows, 4);
        assert_eq!(report.count(EnumAlertCategory::RedAlert), 2);
        assert_eq!(report.count(EnumAlertCategory::NoDate), 1);
    }

    #[test]
    fn test_classify_extended_keeps_expiry_and_days() {
        let df = create_review_frame(&[Some(date(2022, 10, 28)), None, Some(date(2024, 2, 29))]);

        let (df_out, _) =
            classify_review_table(df, EnumClassifyVariant::Extended, date_today()).unwrap();

        assert_eq!(
            df_out.get_column_names_str(),
            vec![
                "CASO",
                C_COL_REVIEW_DATE,
                "NOMBRE",
                C_COL_EXPIRY_DATE,
                C_COL_DAYS_REMAINING,
                C_COL_ALERT
            ]
        );
        assert_eq!(
            df_out.column(C_COL_EXPIRY_DATE).unwrap().dtype(),
            &DataType::Date
        );

        let l_days: Vec<Option<i64>> = df_out
            .column(C_COL_DAYS_REMAINING)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        let n_days_leap = (date(2027, 2, 28) - date_today()).num_days();
        assert_eq!(l_days, vec![Some(10), None, Some(n_days_leap)]);
    }

    #[test]
    fn test_classify_coerces_text_and_serial_columns() {
        let df_text = DataFrame::new(vec![Column::from(Series::new(
            C_COL_REVIEW_DATE.into(),
            vec![Some("28/10/2022"), Some("sin revisar"), None],
        ))])
        .unwrap();
        let (df_out, _) =
            classify_review_table(df_text, EnumClassifyVariant::Basic, date_today()).unwrap();
        assert_eq!(
            df_out.column(C_COL_REVIEW_DATE).unwrap().dtype(),
            &DataType::Date
        );
        assert_eq!(
            derive_labels(&df_out),
            vec![
                Some("ALERTA ROJA".to_string()),
                Some("SIN FECHA".to_string()),
                Some("SIN FECHA".to_string()),
            ]
        );

        // 44862 is 2022-10-28 in the 1900 date system.
        let df_serial = DataFrame::new(vec![Column::from(Series::new(
            C_COL_REVIEW_DATE.into(),
            vec![Some(44_862i64), Some(-5), None],
        ))])
        .unwrap();
        let (df_out, report) =
            classify_review_table(df_serial, EnumClassifyVariant::Basic, date_today()).unwrap();
        assert_eq!(
            derive_labels(&df_out)[0].as_deref(),
            Some("ALERTA ROJA")
        );
        assert_eq!(report.count(EnumAlertCategory::NoDate), 2);
    }

    #[test]
    fn test_classify_takes_date_part_of_datetime_column() {
        let ndt = date(2022, 10, 28).and_hms_opt(16, 45, 0).unwrap();
        let df = DataFrame::new(vec![
            build_datetime_column(C_COL_REVIEW_DATE, &[Some(ndt), None]).unwrap(),
        ])
        .unwrap();

        let (df_out, _) =
            classify_review_table(df, EnumClassifyVariant::Extended, date_today()).unwrap();
        assert_eq!(
            df_out.column(C_COL_REVIEW_DATE).unwrap().dtype(),
            &DataType::Date
        );
        let l_days: Vec<Option<i64>> = df_out
            .column(C_COL_DAYS_REMAINING)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(l_days, vec![Some(10), None]);
        assert_eq!(
            derive_labels(&df_out),
            vec![
                Some("ALERTA ROJA".to_string()),
                Some("SIN FECHA".to_string())
            ]
        );
    }

    #[test]
    fn test_classify_replaces_existing_derived_columns_in_place() {
        let df = DataFrame::new(vec![
            Column::from(Series::new(C_COL_ALERT.into(), vec!["viejo"])),
            build_date_column(C_COL_REVIEW_DATE, &[Some(date(2022, 10, 28))]).unwrap(),
        ])
        .unwrap();

        let (df_out, _) =
            classify_review_table(df, EnumClassifyVariant::Basic, date_today()).unwrap();
        assert_eq!(
            df_out.get_column_names_str(),
            vec![C_COL_ALERT, C_COL_REVIEW_DATE]
        );
        assert_eq!(
            derive_labels(&df_out),
            vec![Some("ALERTA ROJA".to_string())]
        );
    }

    #[test]
    fn test_classify_missing_column_is_reported() {
        let df = DataFrame::new(vec![Column::from(Series::new("FECHA".into(), vec!["x"]))])
            .unwrap();
        let err = classify_review_table(df, EnumClassifyVariant::Basic, date_today()).unwrap_err();
        assert!(matches!(
            err,
            ReviewError::MissingColumn { ref column, .. } if column == C_COL_REVIEW_DATE
        ));
    }

    #[test]
    fn test_classify_is_deterministic_for_fixed_today() {
        let l_dates = [Some(date(2023, 1, 2)), Some(date(2022, 11, 30)), None];
        let (df_a, report_a) = classify_review_table(
            create_review_frame(&l_dates),
            EnumClassifyVariant::Extended,
            date_today(),
        )
        .unwrap();
        let (df_b, report_b) = classify_review_table(
            create_review_frame(&l_dates),
            EnumClassifyVariant::Extended,
            date_today(),
        )
        .unwrap();
        assert!(df_a.equals_missing(&df_b));
        assert_eq!(report_a, report_b);
    }
}
