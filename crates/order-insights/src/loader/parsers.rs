//! Cell-level parsers used when typing the raw CSV columns.
//!
//! Every column arrives from the CSV reader as text. These helpers turn one
//! text column into a typed [`Series`], reporting the first offending cell as
//! a [`ParseError`].

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;

use crate::error::ParseError;

/// Datetime layouts tried in order before falling back to RFC 3339 and bare
/// dates. `%.f` also accepts a missing fractional part.
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Check whether a cell spells a missing value.
pub fn is_missing_marker(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || matches!(
            trimmed.to_ascii_lowercase().as_str(),
            "na" | "n/a" | "nan" | "nat" | "null" | "none" | "<na>" | "#n/a"
        )
}

/// Parse a calendar timestamp. Offsets are normalised to UTC; naive values
/// are taken as-is.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();

    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.naive_utc());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parse an integral number. `"4.0"` is accepted, `"4.5"` is not.
pub fn parse_integer(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if let Ok(int_val) = trimmed.parse::<i64>() {
        return Some(int_val);
    }

    match trimmed.parse::<f64>() {
        Ok(float_val) if float_val.is_finite() && float_val.fract() == 0.0 => {
            Some(float_val as i64)
        }
        _ => None,
    }
}

/// Parse a finite floating point number.
pub fn parse_float(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Convert a text column to `Datetime(ms)`.
pub(crate) fn timestamp_column(column: &Column) -> Result<Series, ParseError> {
    let name = column.name().to_string();
    let values = text_cells(column)?;
    let mut millis: Vec<Option<i64>> = Vec::with_capacity(values.len());

    for (idx, cell) in values.into_iter().enumerate() {
        match cell {
            Some(raw) if !is_missing_marker(raw) => match parse_timestamp(raw) {
                Some(parsed) => millis.push(Some(parsed.and_utc().timestamp_millis())),
                None => {
                    return Err(ParseError::InvalidTimestamp {
                        column: name,
                        row: idx + 1,
                        value: raw.to_string(),
                    });
                }
            },
            _ => millis.push(None),
        }
    }

    Series::new(name.as_str().into(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
        .map_err(|e| ParseError::Malformed(e.to_string()))
}

/// Convert a text column to `Int64`.
pub(crate) fn integer_column(column: &Column) -> Result<Series, ParseError> {
    numeric_column(column, parse_integer)
}

/// Convert a text column to `Float64`.
pub(crate) fn float_column(column: &Column) -> Result<Series, ParseError> {
    numeric_column(column, parse_float)
}

fn numeric_column<T>(column: &Column, parse: fn(&str) -> Option<T>) -> Result<Series, ParseError>
where
    Series: NamedFrom<Vec<Option<T>>, [Option<T>]>,
{
    let name = column.name().to_string();
    let values = text_cells(column)?;
    let mut parsed: Vec<Option<T>> = Vec::with_capacity(values.len());

    for (idx, cell) in values.into_iter().enumerate() {
        match cell {
            Some(raw) if !is_missing_marker(raw) => match parse(raw) {
                Some(v) => parsed.push(Some(v)),
                None => {
                    return Err(ParseError::InvalidNumber {
                        column: name,
                        row: idx + 1,
                        value: raw.to_string(),
                    });
                }
            },
            _ => parsed.push(None),
        }
    }

    Ok(Series::new(name.as_str().into(), parsed))
}

/// Read a column as text cells. The loader asks the CSV reader for text
/// columns only, so anything else is a reader fault.
fn text_cells(column: &Column) -> Result<Vec<Option<&str>>, ParseError> {
    let strings = column
        .str()
        .map_err(|e| ParseError::Malformed(e.to_string()))?;
    Ok(strings.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    // ==================== scalar parser tests ====================

    #[test]
    fn test_parse_timestamp_formats() {
        let plain = parse_timestamp("2017-10-02 10:56:33").unwrap();
        assert_eq!((plain.year(), plain.month(), plain.day()), (2017, 10, 2));
        assert_eq!((plain.hour(), plain.minute(), plain.second()), (10, 56, 33));

        let iso = parse_timestamp("2017-10-02T10:56:33.250").unwrap();
        assert_eq!(iso.second(), 33);
        assert_eq!(iso.and_utc().timestamp_subsec_millis(), 250);

        let date_only = parse_timestamp("2018-01-15").unwrap();
        assert_eq!((date_only.hour(), date_only.minute()), (0, 0));
    }

    #[test]
    fn test_parse_timestamp_with_offset_normalises_to_utc() {
        let parsed = parse_timestamp("2018-01-15T03:00:00+02:00").unwrap();
        assert_eq!(parsed.day(), 15);
        assert_eq!(parsed.hour(), 1);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2018-13-40").is_none());
    }

    #[test]
    fn test_missing_markers() {
        assert!(is_missing_marker(""));
        assert!(is_missing_marker("  "));
        assert!(is_missing_marker("NaN"));
        assert!(is_missing_marker("NaT"));
        assert!(is_missing_marker("null"));
        assert!(!is_missing_marker("0"));
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("4"), Some(4));
        assert_eq!(parse_integer(" 5 "), Some(5));
        assert_eq!(parse_integer("3.0"), Some(3));
        assert_eq!(parse_integer("3.5"), None);
        assert_eq!(parse_integer("five"), None);
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float("13.29"), Some(13.29));
        assert_eq!(parse_float("inf"), None);
        assert_eq!(parse_float("R$ 10"), None);
    }

    // ==================== column converter tests ====================

    #[test]
    fn test_timestamp_column_keeps_missing_cells_null() {
        let column = Column::new(
            "order_approved_at".into(),
            &[Some("2017-10-02 10:56:33"), None, Some("NaT")],
        );
        let series = timestamp_column(&column).unwrap();

        assert_eq!(
            series.dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        assert_eq!(series.null_count(), 2);
    }

    #[test]
    fn test_timestamp_column_reports_row() {
        let column = Column::new(
            "order_approved_at".into(),
            &["2017-10-02 10:56:33", "soon"],
        );
        let err = timestamp_column(&column).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidTimestamp {
                column: "order_approved_at".into(),
                row: 2,
                value: "soon".into(),
            }
        );
    }

    #[test]
    fn test_integer_column() {
        let column = Column::new("review_score".into(), &[Some("5"), Some(""), None]);
        let series = integer_column(&column).unwrap();
        assert_eq!(series.dtype(), &DataType::Int64);
        let values: Vec<Option<i64>> = series.i64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(5), None, None]);
    }

    #[test]
    fn test_float_column_rejects_text() {
        let column = Column::new("freight_value".into(), &["1.5", "cheap"]);
        let err = float_column(&column).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_NUMBER");
    }
}
