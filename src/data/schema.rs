//! Daily Report Schema Module
//! Recognizes the two historical daily report layouts and decodes either one
//! into a common row shape.

use polars::prelude::*;
use std::fmt;
use thiserror::Error;

/// Header of the region column in the legacy layout (column 0).
pub const LEGACY_MARKER: &str = "Province/State";
/// Header of the region column in the current layout (column 2).
pub const CURRENT_MARKER: &str = "Province_State";

const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error(
        "Unknown CSV data structure (headers: {headers:?}); only the \
         `Province/State` and `Province_State` daily report layouts are supported"
    )]
    UnknownSchema { headers: Vec<String> },
    #[error("{layout} layout needs column {index} but the table has {width} columns")]
    MissingColumn {
        layout: TableLayout,
        index: usize,
        width: usize,
    },
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Column positions (0-based) of the fields the aggregation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub region: usize,
    pub country: usize,
    pub confirmed: usize,
    pub deaths: usize,
    pub recovered: usize,
}

impl ColumnMap {
    fn widest(&self) -> usize {
        [
            self.region,
            self.country,
            self.confirmed,
            self.deaths,
            self.recovered,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

/// Known daily report layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLayout {
    /// `Province/State, Country/Region, Last Update, Confirmed, Deaths, Recovered, ...`
    /// One row per region.
    Legacy,
    /// `FIPS, Admin2, Province_State, Country_Region, Last_Update, Lat, Long_,
    /// Confirmed, Deaths, Recovered, ...`
    /// One row per sub-region (county), summed per region.
    Current,
}

impl TableLayout {
    /// Classify a header row. The legacy marker is tested first.
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Option<Self> {
        let header_at = |index: usize| {
            headers
                .get(index)
                .map(|h| h.as_ref().trim_start_matches(BYTE_ORDER_MARK))
        };

        if header_at(0) == Some(LEGACY_MARKER) {
            Some(TableLayout::Legacy)
        } else if header_at(2) == Some(CURRENT_MARKER) {
            Some(TableLayout::Current)
        } else {
            None
        }
    }

    pub fn columns(self) -> ColumnMap {
        match self {
            TableLayout::Legacy => ColumnMap {
                region: 0,
                country: 1,
                confirmed: 3,
                deaths: 4,
                recovered: 5,
            },
            TableLayout::Current => ColumnMap {
                region: 2,
                country: 3,
                confirmed: 7,
                deaths: 8,
                recovered: 9,
            },
        }
    }
}

impl fmt::Display for TableLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableLayout::Legacy => f.write_str("legacy"),
            TableLayout::Current => f.write_str("current"),
        }
    }
}

/// One report row in normalized form. Counts are already zero-substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub region: Option<String>,
    pub country: Option<String>,
    pub confirmed: f64,
    pub deaths: f64,
    pub recovered: f64,
}

impl SnapshotRow {
    /// Exact, case-sensitive match on both country and region.
    pub fn matches(&self, country: &str, region: &str) -> bool {
        self.country.as_deref() == Some(country) && self.region.as_deref() == Some(region)
    }
}

/// A daily report decoded into its layout and normalized rows.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTable {
    pub layout: TableLayout,
    pub rows: Vec<SnapshotRow>,
}

impl DecodedTable {
    /// Decode a loaded report. Missing, non-numeric and NaN counts become 0.
    pub fn decode(df: &DataFrame) -> Result<Self, SchemaError> {
        let headers: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let layout =
            TableLayout::detect(headers.as_slice()).ok_or(SchemaError::UnknownSchema { headers })?;
        let map = layout.columns();

        let width = df.width();
        if map.widest() >= width {
            return Err(SchemaError::MissingColumn {
                layout,
                index: map.widest(),
                width,
            });
        }

        let regions = text_values(df, map.region)?;
        let countries = text_values(df, map.country)?;
        let confirmed = count_values(df, map.confirmed)?;
        let deaths = count_values(df, map.deaths)?;
        let recovered = count_values(df, map.recovered)?;

        let rows = regions
            .into_iter()
            .zip(countries)
            .zip(confirmed.into_iter().zip(deaths).zip(recovered))
            .map(
                |((region, country), ((confirmed, deaths), recovered))| SnapshotRow {
                    region,
                    country,
                    confirmed,
                    deaths,
                    recovered,
                },
            )
            .collect();

        Ok(Self { layout, rows })
    }
}

fn column_at(df: &DataFrame, index: usize) -> Result<&Column, SchemaError> {
    df.select_at_idx(index).ok_or_else(|| {
        PolarsError::ColumnNotFound(format!("column index {index}").into()).into()
    })
}

fn text_values(df: &DataFrame, index: usize) -> Result<Vec<Option<String>>, SchemaError> {
    let text = column_at(df, index)?.cast(&DataType::String)?;
    Ok(text
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

fn count_values(df: &DataFrame, index: usize) -> Result<Vec<f64>, SchemaError> {
    // Non-strict cast: text that is not a number turns into null.
    let numeric = column_at(df, index)?.cast(&DataType::Float64)?;
    Ok(numeric
        .f64()?
        .into_iter()
        .map(|value| match value {
            Some(v) if !v.is_nan() => v,
            _ => 0.0,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_frame() -> DataFrame {
        df!(
            "Province/State" => &[Some("California"), Some("New York"), None],
            "Country/Region" => &["US", "US", "Italy"],
            "Last Update" => &["2020-03-01T10:13:19", "2020-03-01T10:13:19", "2020-03-01T10:13:19"],
            "Confirmed" => &[Some(100.0), Some(12.0), Some(1694.0)],
            "Deaths" => &[Some(5.0), None, Some(34.0)],
            "Recovered" => &[Some(10.0), Some(f64::NAN), Some(83.0)]
        )
        .expect("legacy frame")
    }

    #[test]
    fn detects_legacy_layout_by_first_header() {
        let headers = ["Province/State", "Country/Region", "Last Update"];
        assert_eq!(TableLayout::detect(&headers), Some(TableLayout::Legacy));
    }

    #[test]
    fn detects_current_layout_by_third_header() {
        let headers = ["FIPS", "Admin2", "Province_State", "Country_Region"];
        assert_eq!(TableLayout::detect(&headers), Some(TableLayout::Current));
    }

    #[test]
    fn ignores_byte_order_mark_on_first_header() {
        let headers = ["\u{feff}Province/State", "Country/Region"];
        assert_eq!(TableLayout::detect(&headers), Some(TableLayout::Legacy));
    }

    #[test]
    fn rejects_unknown_headers() {
        let headers = ["State", "Country", "Cases"];
        assert_eq!(TableLayout::detect(&headers), None);
        assert_eq!(TableLayout::detect::<&str>(&[]), None);
    }

    #[test]
    fn decodes_legacy_rows_with_zero_substitution() {
        let table = DecodedTable::decode(&legacy_frame()).expect("decode");
        assert_eq!(table.layout, TableLayout::Legacy);
        assert_eq!(table.rows.len(), 3);

        let california = &table.rows[0];
        assert!(california.matches("US", "California"));
        assert_eq!(
            (california.confirmed, california.deaths, california.recovered),
            (100.0, 5.0, 10.0)
        );

        let new_york = &table.rows[1];
        assert_eq!(new_york.deaths, 0.0);
        assert_eq!(new_york.recovered, 0.0);

        assert_eq!(table.rows[2].region, None);
    }

    #[test]
    fn decodes_non_numeric_counts_as_zero() {
        let df = df!(
            "FIPS" => &[Some(6037i64), None],
            "Admin2" => &["Los Angeles", "Unassigned"],
            "Province_State" => &["California", "California"],
            "Country_Region" => &["US", "US"],
            "Last_Update" => &["2020-03-22 23:45:00", "2020-03-22 23:45:00"],
            "Lat" => &[34.3, 0.0],
            "Long_" => &[-118.2, 0.0],
            "Confirmed" => &["409", "n/a"],
            "Deaths" => &["7", ""],
            "Recovered" => &["0", "3"]
        )
        .expect("current frame");

        let table = DecodedTable::decode(&df).expect("decode");
        assert_eq!(table.layout, TableLayout::Current);
        assert_eq!(table.rows[0].confirmed, 409.0);
        assert_eq!(table.rows[0].deaths, 7.0);
        assert_eq!(table.rows[1].confirmed, 0.0);
        assert_eq!(table.rows[1].deaths, 0.0);
        assert_eq!(table.rows[1].recovered, 3.0);
    }

    #[test]
    fn unknown_layout_is_a_typed_error() {
        let df = df!("State" => &["California"], "Cases" => &[1i64]).expect("frame");
        let err = DecodedTable::decode(&df).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownSchema { ref headers } if headers.len() == 2));
    }

    #[test]
    fn narrow_recognized_table_reports_missing_column() {
        let df = df!(
            "Province/State" => &["California"],
            "Country/Region" => &["US"],
            "Last Update" => &["2020-01-22"],
            "Confirmed" => &[1i64]
        )
        .expect("frame");
        let err = DecodedTable::decode(&df).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::MissingColumn {
                layout: TableLayout::Legacy,
                index: 5,
                width: 4
            }
        ));
    }
}
