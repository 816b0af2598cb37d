//! KPI Calculator Module
//! Total sales, average order value and distinct order count over a subset.

use crate::data::{INVOICE_NO, TOTAL_PRICE};
use polars::prelude::*;
use statrs::statistics::Statistics;

/// The three headline numbers for the current filter selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalesKpis {
    /// Sum of TotalPrice, 0 for an empty subset
    pub total_sales: f64,
    /// Mean TotalPrice per row, NaN for an empty subset
    pub avg_order_value: f64,
    /// Distinct InvoiceNo values
    pub num_orders: usize,
}

impl SalesKpis {
    pub fn from_subset(subset: &DataFrame) -> PolarsResult<Self> {
        let totals: Vec<f64> = subset
            .column(TOTAL_PRICE)?
            .f64()?
            .into_iter()
            .flatten()
            .collect();

        let total_sales: f64 = totals.iter().sum();
        // statrs yields NaN for an empty slice; kept as is
        let avg_order_value = totals.iter().mean();

        let num_orders = subset
            .column(INVOICE_NO)?
            .as_materialized_series()
            .drop_nulls()
            .n_unique()?;

        Ok(Self {
            total_sales,
            avg_order_value,
            num_orders,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(invoices: &[&str], totals: &[f64]) -> DataFrame {
        DataFrame::new(vec![
            Column::new(INVOICE_NO.into(), invoices),
            Column::new(TOTAL_PRICE.into(), totals),
        ])
        .unwrap()
    }

    #[test]
    fn test_kpis() {
        let df = frame(&["1", "1", "2"], &[10.0, 5.0, 15.0]);
        let kpis = SalesKpis::from_subset(&df).unwrap();

        assert_eq!(kpis.total_sales, 30.0);
        assert_eq!(kpis.avg_order_value, 10.0);
        assert_eq!(kpis.num_orders, 2);
    }

    #[test]
    fn test_empty_subset_mean_is_nan() {
        let df = frame(&[], &[]);
        let kpis = SalesKpis::from_subset(&df).unwrap();

        assert_eq!(kpis.total_sales, 0.0);
        assert!(kpis.avg_order_value.is_nan());
        assert_eq!(kpis.num_orders, 0);
    }

    #[test]
    fn test_negative_lines_reduce_total() {
        let df = frame(&["536365", "C536379"], &[15.3, -27.5]);
        let kpis = SalesKpis::from_subset(&df).unwrap();

        assert!((kpis.total_sales - (15.3 - 27.5)).abs() < 1e-9);
        assert_eq!(kpis.num_orders, 2);
    }
}
