//! Stats module - per-region trend aggregation

mod aggregator;

pub use aggregator::{
    decode_reports, AggregateError, DecodedReports, Metric, RegionAggregator, RegionSeries,
    TARGET_COUNTRY,
};
