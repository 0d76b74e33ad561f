//! Case Trends - Daily case report reconciliation & trend charts
//!
//! Loads daily per-region case snapshots written in either of two historical
//! CSV layouts, builds per-region confirmed/recovered/deaths trends and
//! renders them as line charts.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod report;
pub mod stats;
