//! Sales Dashboard - E-commerce sales by date range and country
//!
//! Opens the dashboard window, or prints a text report with `--headless`.

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use sales_dashboard::cli::Args;
use sales_dashboard::config::AppConfig;
use sales_dashboard::data::{store, LoadOptions};
use sales_dashboard::gui::SalesDashboardApp;
use sales_dashboard::report;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sales_dashboard=debug")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let mut config = AppConfig::resolve(args.config.as_deref()).context("loading config")?;
    if let Some(data) = &args.data {
        config.data_path = data.clone();
    }
    config.validate()?;

    store::install(&config.data_path, LoadOptions::from(&config))?;
    info!(path = %config.data_path.display(), "Data source installed");

    if args.headless {
        run_headless(&args, &config)
    } else {
        run_gui(config)
    }
}

/// Load, filter, print, and optionally export without a window
fn run_headless(args: &Args, config: &AppConfig) -> Result<()> {
    let table = store::load().context("loading sales data")?;

    let Some(params) =
        report::params_from_bounds(&table, args.start, args.end, args.countries.clone())
    else {
        anyhow::bail!("No rows in {} and no date range given", config.data_path.display());
    };

    let view = sales_dashboard::render(&table, &params, config.preview_rows)?;

    let stdout = std::io::stdout();
    report::write_report(&mut stdout.lock(), &view)?;

    if let Some(path) = &args.export {
        view.export.write_to(path)?;
    }

    Ok(())
}

fn run_gui(config: AppConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title(&config.window_title),
        ..Default::default()
    };

    let title = config.window_title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(|cc| Ok(Box::new(SalesDashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI failed: {}", e))
}
