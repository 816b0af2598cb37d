//! Sales Dashboard - E-commerce transactions by date and country
//!
//! Loads a transaction CSV once, filters it by date range and country,
//! computes the headline KPIs and the daily / per-country sales series,
//! and presents them in an egui window or as a plain-text report.

pub mod charts;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod gui;
pub mod report;
pub mod stats;

pub use config::AppConfig;
pub use dashboard::{render, DashboardView};
pub use data::{filter_and_aggregate, FilterParams, SalesTable};
pub use stats::SalesKpis;
