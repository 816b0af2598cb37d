//! GUI module - User interface components

mod app;
mod dashboard_panel;
mod filter_panel;
pub mod footer;

pub use app::SalesDashboardApp;
pub use dashboard_panel::{DashboardAction, DashboardPanel};
pub use filter_panel::FilterPanel;
