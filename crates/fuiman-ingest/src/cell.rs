//! Typed access to DataFrame cells.
//!
//! Columns are decoded once into [`Cell`]s so that the validator and the
//! transformer agree on what a value is. Whitespace-only text is null.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use polars::prelude::{AnyValue, Column, DataFrame, DataType, TimeUnit};

use crate::error::{IngestError, Result};

/// Wire format for date-time values.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// A decoded cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Boolean(bool),
    /// Numeric cell, rendered without trailing zeros.
    Number(String),
    /// Trimmed text.
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Display form used in reports and for string columns.
    pub fn render(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Boolean(b) => b.to_string(),
            Cell::Number(s) | Cell::Text(s) => s.clone(),
            Cell::Timestamp(ts) => format_timestamp(ts),
        }
    }

    /// Boolean value of a boolean cell or `true`/`false` text.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Cell::Boolean(b) => Some(*b),
            Cell::Text(s) => parse_bool(s),
            _ => None,
        }
    }

    /// Splits a list cell on `delimiter`, trimming items and dropping empty ones.
    pub fn list_items(&self, delimiter: char) -> Vec<String> {
        match self {
            Cell::Null => Vec::new(),
            other => other
                .render()
                .split(delimiter)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// Timestamp of a temporal cell or ISO 8601 text.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Cell::Timestamp(ts) => Some(*ts),
            Cell::Text(s) => parse_timestamp(s),
            _ => None,
        }
    }
}

/// Reads typed cells from a DataFrame.
#[derive(Debug)]
pub struct CellReader<'a> {
    df: &'a DataFrame,
}

impl<'a> CellReader<'a> {
    #[inline]
    pub fn new(df: &'a DataFrame) -> Self {
        Self { df }
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Column names in header order.
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .into_iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Decodes every cell of a column.
    pub fn cells(&self, name: &str) -> Result<Vec<Cell>> {
        let column = self.df.column(name).map_err(|_| IngestError::ColumnNotFound {
            column: name.to_string(),
        })?;
        decode_column(column)
    }
}

/// Decodes a column into cells, resolving temporal physical values.
pub fn decode_column(column: &Column) -> Result<Vec<Cell>> {
    let len = column.len();
    let cells = match column.dtype() {
        DataType::Date => {
            let days = column.cast(&DataType::Int32)?;
            (0..len)
                .map(|idx| match days.get(idx).unwrap_or(AnyValue::Null) {
                    AnyValue::Int32(d) => date_from_days(d).map_or(Cell::Null, Cell::Timestamp),
                    _ => Cell::Null,
                })
                .collect()
        }
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let ticks = column.cast(&DataType::Int64)?;
            (0..len)
                .map(|idx| match ticks.get(idx).unwrap_or(AnyValue::Null) {
                    AnyValue::Int64(t) => datetime_from_ticks(t, unit).map_or(Cell::Null, Cell::Timestamp),
                    _ => Cell::Null,
                })
                .collect()
        }
        _ => (0..len)
            .map(|idx| any_to_cell(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect(),
    };
    Ok(cells)
}

/// Converts a scalar `AnyValue` into a cell.
pub fn any_to_cell(value: AnyValue<'_>) -> Cell {
    match value {
        AnyValue::Null => Cell::Null,
        AnyValue::Boolean(b) => Cell::Boolean(b),
        AnyValue::Int8(v) => Cell::Number(v.to_string()),
        AnyValue::Int16(v) => Cell::Number(v.to_string()),
        AnyValue::Int32(v) => Cell::Number(v.to_string()),
        AnyValue::Int64(v) => Cell::Number(v.to_string()),
        AnyValue::UInt8(v) => Cell::Number(v.to_string()),
        AnyValue::UInt16(v) => Cell::Number(v.to_string()),
        AnyValue::UInt32(v) => Cell::Number(v.to_string()),
        AnyValue::UInt64(v) => Cell::Number(v.to_string()),
        AnyValue::Float32(v) => Cell::Number(format_numeric(f64::from(v))),
        AnyValue::Float64(v) => Cell::Number(format_numeric(v)),
        AnyValue::String(s) => text_cell(s),
        AnyValue::StringOwned(s) => text_cell(s.as_str()),
        other => {
            let s = other.to_string();
            let s = s
                .strip_prefix('"')
                .and_then(|inner| inner.strip_suffix('"'))
                .unwrap_or(&s);
            text_cell(s)
        }
    }
}

fn text_cell(s: &str) -> Cell {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        Cell::Null
    } else {
        Cell::Text(trimmed.to_string())
    }
}

/// Formats a float without a trailing `.0` or trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Formats a timestamp as `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses `true`/`false`, ignoring ASCII case.
pub fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parses ISO 8601 dates and date-times. Values without an offset are UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn date_from_days(days: i32) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(i64::from(days) * 86_400, 0)
}

fn datetime_from_ticks(ticks: i64, unit: TimeUnit) -> Option<DateTime<Utc>> {
    match unit {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(ticks),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(ticks),
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(ticks)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    #[test]
    fn test_text_is_trimmed_and_blank_is_null() {
        assert_eq!(any_to_cell(AnyValue::String("  alice ")), Cell::Text("alice".into()));
        assert_eq!(any_to_cell(AnyValue::String("   ")), Cell::Null);
        assert_eq!(any_to_cell(AnyValue::Null), Cell::Null);
    }

    #[test]
    fn test_numbers_render_without_trailing_zeros() {
        assert_eq!(any_to_cell(AnyValue::Int64(42)).render(), "42");
        assert_eq!(any_to_cell(AnyValue::Float64(40.0)).render(), "40");
        assert_eq!(any_to_cell(AnyValue::Float64(1.50)).render(), "1.5");
    }

    #[test]
    fn test_bool_text() {
        assert_eq!(Cell::Text("TRUE".into()).as_bool(), Some(true));
        assert_eq!(Cell::Text("false".into()).as_bool(), Some(false));
        assert_eq!(Cell::Text("yes".into()).as_bool(), None);
        assert_eq!(Cell::Boolean(true).as_bool(), Some(true));
        assert_eq!(Cell::Number("1".into()).as_bool(), None);
    }

    #[test]
    fn test_list_items() {
        let cell = Cell::Text("Support; Programs;;".into());
        assert_eq!(cell.list_items(';'), vec!["Support", "Programs"]);
        assert!(Cell::Null.list_items(';').is_empty());
        assert_eq!(Cell::Number("7".into()).list_items(';'), vec!["7"]);
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = "2024-03-01T12:30:00.000Z";
        for text in [
            "2024-03-01T12:30:00Z",
            "2024-03-01T12:30:00",
            "2024-03-01 12:30:00",
            "2024-03-01T14:30:00+02:00",
        ] {
            let ts = parse_timestamp(text).unwrap();
            assert_eq!(format_timestamp(&ts), expected, "{text}");
        }
        let date = parse_timestamp("2024-03-01").unwrap();
        assert_eq!(format_timestamp(&date), "2024-03-01T00:00:00.000Z");
        assert!(parse_timestamp("01/03/2024").is_none());
    }

    #[test]
    fn test_decode_date_column() {
        let dates = Series::new("d".into(), &[19_737i32, 19_754])
            .cast(&DataType::Date)
            .unwrap()
            .into_column();
        let cells = decode_column(&dates).unwrap();
        assert_eq!(cells[0].render(), "2024-01-15T00:00:00.000Z");
        assert_eq!(cells[1].render(), "2024-02-01T00:00:00.000Z");
    }

    #[test]
    fn test_decode_datetime_ticks() {
        let ts = datetime_from_ticks(1_700_000_000_123, TimeUnit::Milliseconds).unwrap();
        assert_eq!(format_timestamp(&ts), "2023-11-14T22:13:20.123Z");
        let ts = datetime_from_ticks(1_700_000_000_123_000, TimeUnit::Microseconds).unwrap();
        assert_eq!(format_timestamp(&ts), "2023-11-14T22:13:20.123Z");
    }

    #[test]
    fn test_reader_missing_column() {
        let df = DataFrame::empty();
        let reader = CellReader::new(&df);
        assert!(matches!(
            reader.cells("username"),
            Err(IngestError::ColumnNotFound { .. })
        ));
    }
}
