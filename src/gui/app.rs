//! Titanic EDA Main Application
//! Main window with control panel and dashboard.

use crate::charts::{
    select_bivariate, select_univariate, BivariateSelection, ChartBuilder, ChartData,
    StaticChartRenderer,
};
use crate::config::AppConfig;
use crate::data::{overview, DataLoader};
use crate::gui::chart_viewer::{BivariateView, ChartViewerAction, TablePreview};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// Exported PNG size
const EXPORT_WIDTH: u32 = 1200;
const EXPORT_HEIGHT: u32 = 800;

/// CSV loading result from background thread
enum LoadResult {
    Progress(String),
    Complete(DataLoader),
    Error(String),
}

/// Main application window.
pub struct EdaApp {
    config: AppConfig,
    loader: DataLoader,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl EdaApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let mut app = Self {
            config,
            loader: DataLoader::new(),
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        };

        let path = app.config.dataset_path.clone();
        if path.exists() {
            app.start_loading(path);
        } else {
            log::warn!("dataset {} not found, waiting for a file", path.display());
            app.control_panel
                .set_status(&format!("Dataset {} not found", path.display()));
        }
        app
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_loading(path);
        }
    }

    /// Read the CSV in a background thread
    fn start_loading(&mut self, path: PathBuf) {
        log::info!("loading {}", path.display());
        self.chart_viewer.clear();
        self.control_panel.settings.csv_path = Some(path.clone());
        self.control_panel.set_status("Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress("Reading CSV file...".to_string()));

            let mut loader = DataLoader::new();
            match loader.load_csv(&path) {
                Ok(_) => {
                    let _ = tx.send(LoadResult::Complete(loader));
                }
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_status(&status);
                    }
                    LoadResult::Complete(loader) => {
                        self.on_dataset_loaded(loader);
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        log::error!("CSV load failed: {error}");
                        self.control_panel.set_status(&format!("Error: {}", error));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    fn on_dataset_loaded(&mut self, loader: DataLoader) {
        self.loader = loader;
        if let Some(df) = self.loader.get_dataframe() {
            self.chart_viewer.overview = Some(overview(df));
            match TablePreview::from_dataframe(df, self.config.preview_rows) {
                Ok(preview) => self.chart_viewer.preview = preview,
                Err(e) => log::warn!("dataset preview unavailable: {e}"),
            }
        }

        let columns = self.loader.get_columns();
        let column_count = columns.len();
        self.control_panel.update_columns(columns, &self.config.selector);
        let file_name = self
            .loader
            .get_file_path()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.control_panel.set_status(&format!(
            "Loaded {}: {} rows, {} columns",
            file_name,
            self.loader.get_row_count(),
            column_count
        ));
        self.refresh_charts();
    }

    /// Rebuild the univariate and bivariate sections from the current selections.
    fn refresh_charts(&mut self) {
        let Some(df) = self.loader.get_dataframe() else {
            return;
        };
        let settings = &self.control_panel.settings;
        let max_words = self.config.selector.max_cloud_words;

        self.chart_viewer.univariate = if settings.show_univariate {
            self.loader
                .get_column(&settings.univariate_col)
                .map(|column| {
                    let request = select_univariate(&column, &self.config.selector);
                    log::debug!("univariate {} -> {}", column.name, request.kind);
                    let chart = ChartBuilder::build(df, &request, max_words).map_err(|e| {
                        log::error!("building {} failed: {e}", request.title);
                        e.to_string()
                    });
                    (column.name, chart)
                })
        } else {
            None
        };

        self.chart_viewer.bivariate = if settings.show_bivariate {
            let first = self.loader.get_column(&settings.first_col);
            let second = self.loader.get_column(&settings.second_col);
            match (first, second) {
                (Some(first), Some(second)) => {
                    let selection = select_bivariate(&first, &second);
                    log::debug!(
                        "bivariate {} x {} applicable: {}",
                        first.name,
                        second.name,
                        selection.is_applicable()
                    );
                    let view = match selection {
                        BivariateSelection::NotApplicable => BivariateView::NotApplicable,
                        BivariateSelection::Charts(requests) => {
                            match ChartBuilder::build_all(df, &requests, max_words) {
                                Ok(charts) => BivariateView::Charts(charts),
                                Err(e) => {
                                    log::error!(
                                        "bivariate {} / {} failed: {e}",
                                        first.name,
                                        second.name
                                    );
                                    BivariateView::Error(e.to_string())
                                }
                            }
                        }
                    };
                    Some(view)
                }
                _ => None,
            }
        } else {
            None
        };
    }

    /// Render a chart to PNG and open it
    fn handle_save_png(&mut self, chart: &ChartData) {
        let file_name = format!("{}.png", chart.title().replace([' ', '/'], "_"));
        let Some(output_path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(file_name.as_str())
            .save_file()
        else {
            return;
        };

        match StaticChartRenderer::save_png(chart, &output_path, EXPORT_WIDTH, EXPORT_HEIGHT) {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Saved {}", output_path.display()));
                if let Err(e) = open::that(&output_path) {
                    log::warn!("could not open {}: {e}", output_path.display());
                }
            }
            Err(e) => {
                log::error!("PNG export failed: {e}");
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for EdaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::SelectionChanged => self.refresh_charts(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            if let ChartViewerAction::SavePng(chart) = self.chart_viewer.show(ui) {
                self.handle_save_png(&chart);
            }
        });
    }
}
