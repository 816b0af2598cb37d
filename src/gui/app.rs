//! Sales Dashboard Main Application
//! Main window with the filter sidebar, the dashboard and the footer.

use crate::charts::StaticChartRenderer;
use crate::config::AppConfig;
use crate::dashboard::{self, DashboardView};
use crate::data::{store, SalesTable, EXPORT_FILE_NAME};
use crate::gui::{footer, DashboardAction, DashboardPanel, FilterPanel};
use egui::SidePanel;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use tracing::{error, info, warn};

const PNG_WIDTH: u32 = 1200;
const PNG_HEIGHT: u32 = 700;

/// First-load result from the background thread
enum LoadResult {
    Complete(Arc<SalesTable>),
    Error(String),
}

/// Main application window.
pub struct SalesDashboardApp {
    config: AppConfig,
    table: Option<Arc<SalesTable>>,
    filter_panel: FilterPanel,
    view: Option<DashboardView>,
    error: Option<String>,

    // Async first load
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl SalesDashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let mut app = Self {
            config,
            table: None,
            filter_panel: FilterPanel::new(),
            view: None,
            error: None,
            load_rx: None,
            is_loading: false,
        };
        app.start_load();
        app
    }

    /// Fetch the memoized table on a background thread.
    fn start_load(&mut self) {
        if self.is_loading {
            return;
        }

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.is_loading = true;
        self.filter_panel.set_status("Loading CSV file...");

        thread::spawn(move || {
            let result = match store::load() {
                Ok(table) => LoadResult::Complete(table),
                Err(e) => LoadResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for the load result
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete(table)) => {
                self.filter_panel.reset_for_table(&table);
                self.filter_panel.set_status(&format!(
                    "Loaded {} rows, {} columns",
                    table.height(),
                    table.column_names().len()
                ));
                self.table = Some(table);
                self.is_loading = false;
                self.refresh_view();
            }
            Ok(LoadResult::Error(e)) => {
                error!(error = %e, "Failed to load sales data");
                self.filter_panel.set_status(&format!("Error: {}", e));
                self.error = Some(e);
                self.is_loading = false;
            }
            Err(_) => {
                // Still loading
                self.load_rx = Some(rx);
            }
        }
    }

    /// Re-run filter, aggregation and formatting for the current inputs.
    fn refresh_view(&mut self) {
        let Some(table) = &self.table else {
            return;
        };

        let params = self.filter_panel.params();
        match dashboard::render(table, &params, self.config.preview_rows) {
            Ok(view) => {
                self.view = Some(view);
                self.error = None;
            }
            Err(e) => {
                error!(error = %e, "Failed to render dashboard");
                self.error = Some(e.to_string());
            }
        }
    }

    /// Save the current subset as CSV
    fn handle_export_csv(&mut self) {
        let Some(view) = &self.view else {
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(EXPORT_FILE_NAME)
            .save_file()
        else {
            return; // User cancelled
        };

        match view.export.write_to(&path) {
            Ok(()) => self
                .filter_panel
                .set_status(&format!("Exported {} rows", view.export.rows)),
            Err(e) => {
                warn!(error = %e, "CSV export failed");
                self.filter_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    /// Render one chart to a PNG chosen by the user
    fn handle_save_png(&mut self, action: DashboardAction) {
        let Some(view) = &self.view else {
            return;
        };

        let default_name = match action {
            DashboardAction::SaveTrendPng => "sales_trend.png",
            DashboardAction::SaveCountryPng => "sales_by_country.png",
            _ => return,
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(default_name)
            .save_file()
        else {
            return;
        };

        let result = match action {
            DashboardAction::SaveTrendPng => {
                StaticChartRenderer::render_sales_trend(&path, &view.by_day, PNG_WIDTH, PNG_HEIGHT)
            }
            _ => StaticChartRenderer::render_sales_by_country(
                &path,
                &view.by_country,
                PNG_WIDTH,
                PNG_HEIGHT,
            ),
        };

        match result {
            Ok(()) => {
                info!(path = %path.display(), "Chart saved");
                self.filter_panel
                    .set_status(&format!("Saved {}", path.display()));
            }
            Err(e) => {
                warn!(error = %e, "Chart export failed");
                self.filter_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for SalesDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Filters
        SidePanel::left("filter_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    if self.filter_panel.show(ui) {
                        self.refresh_view();
                    }
                });
            });

        // Bottom panel - Footer
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            footer::show(ui);
        });

        // Central panel - Dashboard
        let action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                DashboardPanel::show(
                    ui,
                    &self.config.window_title,
                    self.view.as_ref(),
                    self.error.as_deref(),
                )
            })
            .inner;

        match action {
            DashboardAction::ExportCsv => self.handle_export_csv(),
            DashboardAction::SaveTrendPng | DashboardAction::SaveCountryPng => {
                self.handle_save_png(action)
            }
            DashboardAction::None => {}
        }
    }
}
