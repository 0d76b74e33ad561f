//! Region Aggregator Module
//! Reconciles every daily report into per-region confirmed/recovered/deaths
//! trend sequences.

use crate::data::{DailyTables, DateKey, DecodedTable, SchemaError, TableLayout};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

/// Country value a row must carry to count towards a region.
pub const TARGET_COUNTRY: &str = "US";

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Report {date} could not be decoded: {source}")]
    Schema {
        date: DateKey,
        #[source]
        source: SchemaError,
    },
}

/// Every report decoded once, ordered by date key.
pub type DecodedReports = BTreeMap<DateKey, DecodedTable>;

/// Decode every report in date order. The first report with an
/// unrecognized layout aborts; reports after it are never decoded.
pub fn decode_reports(tables: &DailyTables) -> Result<DecodedReports, AggregateError> {
    let mut decoded = DecodedReports::new();
    for (date, df) in tables {
        let table = DecodedTable::decode(df).map_err(|source| AggregateError::Schema {
            date: date.clone(),
            source,
        })?;
        debug!(date = %date, layout = %table.layout, rows = table.rows.len(), "decoded report");
        decoded.insert(date.clone(), table);
    }
    Ok(decoded)
}

/// The three tracked case metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Confirmed,
    Recovered,
    Deaths,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Confirmed, Metric::Recovered, Metric::Deaths];

    /// Chart title for this metric in `region`.
    pub fn title(self, region: &str) -> String {
        match self {
            Metric::Confirmed => format!("Confirmed Cases over Time ({region})"),
            Metric::Recovered => format!("Recovered Cases over Time ({region})"),
            Metric::Deaths => format!("Death Cases over Time ({region})"),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Confirmed => f.write_str("confirmed"),
            Metric::Recovered => f.write_str("recovered"),
            Metric::Deaths => f.write_str("deaths"),
        }
    }
}

/// Trend sequences of one region. Index `i` of every sequence (including
/// `dates`) refers to the same appended entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionSeries {
    pub dates: Vec<DateKey>,
    pub confirmed_cases_trend: Vec<f64>,
    pub recovered_cases_trend: Vec<f64>,
    pub deaths_trend: Vec<f64>,
}

impl RegionSeries {
    fn push(&mut self, date: &DateKey, confirmed: f64, recovered: f64, deaths: f64) {
        self.dates.push(date.clone());
        self.confirmed_cases_trend.push(confirmed);
        self.recovered_cases_trend.push(recovered);
        self.deaths_trend.push(deaths);
    }

    /// Append the entries one decoded report contributes for `region`.
    ///
    /// Legacy reports append one entry per matching row (none when nothing
    /// matches). Current reports always append exactly one entry holding
    /// the sum of all matching rows.
    fn accumulate(&mut self, region: &str, date: &DateKey, table: &DecodedTable) {
        let matching = table
            .rows
            .iter()
            .filter(|row| row.matches(TARGET_COUNTRY, region));

        match table.layout {
            TableLayout::Legacy => {
                for row in matching {
                    self.push(date, row.confirmed, row.recovered, row.deaths);
                }
            }
            TableLayout::Current => {
                let (confirmed, recovered, deaths) =
                    matching.fold((0.0, 0.0, 0.0), |(c, r, d), row| {
                        (c + row.confirmed, r + row.recovered, d + row.deaths)
                    });
                self.push(date, confirmed, recovered, deaths);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Case trends of a single region, computed once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionAggregator {
    region_name: String,
    series: RegionSeries,
}

impl RegionAggregator {
    /// Scan every report in date order and freeze the region's trends.
    ///
    /// A report with an unrecognized layout aborts construction; reports
    /// after it are never looked at.
    pub fn new(
        region_name: impl Into<String>,
        tables: &DailyTables,
    ) -> Result<Self, AggregateError> {
        let region_name = region_name.into();
        let mut series = RegionSeries::default();

        for (date, df) in tables {
            let table = DecodedTable::decode(df).map_err(|source| AggregateError::Schema {
                date: date.clone(),
                source,
            })?;
            debug!(region = %region_name, date = %date, layout = %table.layout, "scanning report");
            series.accumulate(&region_name, date, &table);
        }

        info!(region = %region_name, entries = series.len(), "aggregated region trends");
        Ok(Self {
            region_name,
            series,
        })
    }

    /// Same accumulation over reports that were decoded elsewhere.
    pub fn from_decoded<'a, I>(region_name: impl Into<String>, tables: I) -> Self
    where
        I: IntoIterator<Item = (&'a DateKey, &'a DecodedTable)>,
    {
        let region_name = region_name.into();
        let mut series = RegionSeries::default();
        for (date, table) in tables {
            series.accumulate(&region_name, date, table);
        }
        debug!(region = %region_name, entries = series.len(), "aggregated region trends");
        Self {
            region_name,
            series,
        }
    }

    pub fn region_name(&self) -> &str {
        &self.region_name
    }

    pub fn confirmed_cases_trend(&self) -> &[f64] {
        &self.series.confirmed_cases_trend
    }

    pub fn recovered_cases_trend(&self) -> &[f64] {
        &self.series.recovered_cases_trend
    }

    pub fn deaths_trend(&self) -> &[f64] {
        &self.series.deaths_trend
    }

    /// Report each trend entry came from.
    pub fn dates(&self) -> &[DateKey] {
        &self.series.dates
    }

    pub fn trend(&self, metric: Metric) -> &[f64] {
        match metric {
            Metric::Confirmed => self.confirmed_cases_trend(),
            Metric::Recovered => self.recovered_cases_trend(),
            Metric::Deaths => self.deaths_trend(),
        }
    }

    pub fn series(&self) -> &RegionSeries {
        &self.series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SnapshotRow;
    use polars::prelude::*;
    use std::collections::BTreeMap;

    fn row(region: &str, country: &str, confirmed: f64, deaths: f64, recovered: f64) -> SnapshotRow {
        SnapshotRow {
            region: Some(region.to_string()),
            country: Some(country.to_string()),
            confirmed,
            deaths,
            recovered,
        }
    }

    fn legacy(rows: Vec<SnapshotRow>) -> DecodedTable {
        DecodedTable {
            layout: TableLayout::Legacy,
            rows,
        }
    }

    fn current(rows: Vec<SnapshotRow>) -> DecodedTable {
        DecodedTable {
            layout: TableLayout::Current,
            rows,
        }
    }

    #[test]
    fn single_legacy_row_fills_all_three_trends() {
        let tables = BTreeMap::from([(
            DateKey::new("03-01-2020"),
            legacy(vec![row("California", "US", 100.0, 5.0, 10.0)]),
        )]);

        let agg = RegionAggregator::from_decoded("California", &tables);
        assert_eq!(agg.confirmed_cases_trend(), &[100.0]);
        assert_eq!(agg.deaths_trend(), &[5.0]);
        assert_eq!(agg.recovered_cases_trend(), &[10.0]);
        assert_eq!(agg.dates(), &[DateKey::new("03-01-2020")]);
    }

    #[test]
    fn legacy_appends_once_per_matching_row() {
        let tables = BTreeMap::from([
            (DateKey::new("03-01-2020"), legacy(vec![row("Texas", "US", 1.0, 0.0, 0.0)])),
            (
                DateKey::new("03-02-2020"),
                legacy(vec![
                    row("Texas", "US", 2.0, 0.0, 0.0),
                    row("Texas", "US", 3.0, 1.0, 0.0),
                ]),
            ),
            (DateKey::new("03-03-2020"), legacy(vec![row("Ohio", "US", 9.0, 0.0, 0.0)])),
        ]);

        let agg = RegionAggregator::from_decoded("Texas", &tables);
        assert_eq!(agg.confirmed_cases_trend(), &[1.0, 2.0, 3.0]);
        assert_eq!(agg.deaths_trend(), &[0.0, 0.0, 1.0]);
        assert_eq!(agg.dates().len(), 3);
        assert_eq!(agg.dates()[2].as_str(), "03-02-2020");
    }

    #[test]
    fn current_layout_sums_sub_region_rows_into_one_entry() {
        let tables = BTreeMap::from([(
            DateKey::new("04-01-2020"),
            current(vec![
                row("New York", "US", 40.0, 2.0, 1.0),
                row("New York", "US", 60.0, 3.0, 0.0),
                row("New Jersey", "US", 500.0, 9.0, 0.0),
            ]),
        )]);

        let agg = RegionAggregator::from_decoded("New York", &tables);
        assert_eq!(agg.confirmed_cases_trend(), &[100.0]);
        assert_eq!(agg.deaths_trend(), &[5.0]);
        assert_eq!(agg.recovered_cases_trend(), &[1.0]);
    }

    #[test]
    fn current_layout_without_match_appends_zero_triple() {
        let tables: BTreeMap<DateKey, DecodedTable> = (1..=4)
            .map(|day| {
                (
                    DateKey::new(format!("04-0{day}-2020")),
                    current(vec![row("Nevada", "US", 7.0, 1.0, 1.0)]),
                )
            })
            .collect();

        let agg = RegionAggregator::from_decoded("Utah", &tables);
        assert_eq!(agg.confirmed_cases_trend(), &[0.0; 4]);
        assert_eq!(agg.recovered_cases_trend(), &[0.0; 4]);
        assert_eq!(agg.deaths_trend(), &[0.0; 4]);
    }

    #[test]
    fn legacy_without_match_appends_nothing() {
        let tables = BTreeMap::from([(
            DateKey::new("02-01-2020"),
            legacy(vec![row("Hubei", "Mainland China", 7153.0, 249.0, 168.0)]),
        )]);

        let agg = RegionAggregator::from_decoded("Washington", &tables);
        assert!(agg.series().is_empty());
        assert!(agg.confirmed_cases_trend().is_empty());
    }

    #[test]
    fn region_and_country_match_is_exact() {
        let tables = BTreeMap::from([(
            DateKey::new("04-01-2020"),
            current(vec![
                row("california", "US", 1.0, 0.0, 0.0),
                row("California", "Mexico", 2.0, 0.0, 0.0),
                row("California ", "US", 4.0, 0.0, 0.0),
            ]),
        )]);

        let agg = RegionAggregator::from_decoded("California", &tables);
        assert_eq!(agg.confirmed_cases_trend(), &[0.0]);
    }

    #[test]
    fn mixed_layouts_keep_trends_index_aligned() {
        let tables = BTreeMap::from([
            (DateKey::new("03-21-2020"), legacy(vec![row("Iowa", "US", 45.0, 0.0, 0.0)])),
            (DateKey::new("03-22-2020"), current(vec![])),
            (
                DateKey::new("03-23-2020"),
                current(vec![row("Iowa", "US", 50.0, 1.0, 0.0), row("Iowa", "US", 55.0, 0.0, 0.0)]),
            ),
        ]);

        let agg = RegionAggregator::from_decoded("Iowa", &tables);
        let series = agg.series();
        assert_eq!(series.len(), 3);
        assert_eq!(series.confirmed_cases_trend.len(), series.recovered_cases_trend.len());
        assert_eq!(series.confirmed_cases_trend.len(), series.deaths_trend.len());
        assert_eq!(agg.trend(Metric::Confirmed), &[45.0, 0.0, 105.0]);
        assert_eq!(agg.trend(Metric::Deaths), &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn unknown_layout_aborts_with_offending_date() {
        let mut tables = DailyTables::new();
        tables.insert(
            DateKey::new("01-22-2020"),
            df!(
                "Province/State" => &["Washington"],
                "Country/Region" => &["US"],
                "Last Update" => &["1/22/2020 17:00"],
                "Confirmed" => &[1i64],
                "Deaths" => &[None::<i64>],
                "Recovered" => &[None::<i64>]
            )
            .expect("legacy frame"),
        );
        tables.insert(
            DateKey::new("01-23-2020"),
            df!("Region" => &["Washington"], "Cases" => &[1i64]).expect("bad frame"),
        );

        let err = RegionAggregator::new("Washington", &tables).unwrap_err();
        match err {
            AggregateError::Schema { date, source } => {
                assert_eq!(date.as_str(), "01-23-2020");
                assert!(matches!(source, SchemaError::UnknownSchema { .. }));
            }
        }
    }

    #[test]
    fn decode_reports_stops_at_first_unrecognized_report() {
        let mut tables = DailyTables::new();
        tables.insert(
            DateKey::new("01-22-2020"),
            df!(
                "Province/State" => &["Washington"],
                "Country/Region" => &["US"],
                "Last Update" => &["1/22/2020 17:00"],
                "Confirmed" => &[1i64],
                "Deaths" => &[0i64],
                "Recovered" => &[0i64]
            )
            .expect("legacy frame"),
        );
        tables.insert(
            DateKey::new("01-23-2020"),
            df!("Region" => &["Washington"], "Cases" => &[2i64]).expect("bad frame"),
        );

        let AggregateError::Schema { date, .. } = decode_reports(&tables).unwrap_err();
        assert_eq!(date.as_str(), "01-23-2020");

        tables.remove(&DateKey::new("01-23-2020"));
        let decoded = decode_reports(&tables).expect("decode");
        assert_eq!(decoded.len(), 1);
        assert_eq!(
            RegionAggregator::from_decoded("Washington", &decoded),
            RegionAggregator::new("Washington", &tables).expect("aggregate")
        );
    }

    #[test]
    fn aggregation_is_deterministic() {
        let mut tables = DailyTables::new();
        tables.insert(
            DateKey::new("03-10-2020"),
            df!(
                "Province/State" => &["Washington", "New York"],
                "Country/Region" => &["US", "US"],
                "Last Update" => &["2020-03-10T19:13:15", "2020-03-10T17:13:27"],
                "Confirmed" => &[267i64, 173],
                "Deaths" => &[23i64, 0],
                "Recovered" => &[1i64, 0]
            )
            .expect("frame"),
        );

        let first = RegionAggregator::new("Washington", &tables).expect("first run");
        let second = RegionAggregator::new("Washington", &tables).expect("second run");
        assert_eq!(first, second);
        assert_eq!(first.confirmed_cases_trend(), &[267.0]);
        assert_eq!(first.recovered_cases_trend(), &[1.0]);
    }

    #[test]
    fn metric_titles_name_the_region() {
        assert_eq!(
            Metric::Confirmed.title("Ohio"),
            "Confirmed Cases over Time (Ohio)"
        );
        assert_eq!(Metric::Deaths.title("Ohio"), "Death Cases over Time (Ohio)");
    }
}
