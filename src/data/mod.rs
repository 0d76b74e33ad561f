//! Data module - daily report loading and schema decoding

mod loader;
mod schema;

pub use loader::{DailyTables, DataLoader, DateKey, LoaderError, REPORT_EXTENSION};
pub use schema::{
    ColumnMap, DecodedTable, SchemaError, SnapshotRow, TableLayout, CURRENT_MARKER, LEGACY_MARKER,
};
