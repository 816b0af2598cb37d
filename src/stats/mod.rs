//! Stats module - KPI computation

mod kpi;

pub use kpi::SalesKpis;
