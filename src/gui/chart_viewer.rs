//! Chart Viewer Widget
//! Central scrollable dashboard: dataset preview, shape, dtypes, null counts,
//! then the univariate and bivariate analysis sections.

use crate::charts::{
    ChartData, ChartKind, ChartPayload, ChartPlotter, PieSlice, NOT_APPLICABLE_MESSAGE,
};
use crate::data::{DataProcessor, DatasetOverview, ProcessorError};
use egui::{RichText, ScrollArea};
use polars::prelude::DataFrame;

const SECTION_SPACING: f32 = 15.0;
const ROW_HEIGHT: f32 = 18.0;
const PREVIEW_HEIGHT: f32 = 300.0;

/// First rows of the dataset rendered as text.
#[derive(Debug, Clone, Default)]
pub struct TablePreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TablePreview {
    pub fn from_dataframe(df: &DataFrame, max_rows: usize) -> Result<Self, ProcessorError> {
        let head = df.head(Some(max_rows));
        let headers: Vec<String> = head
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut columns = Vec::with_capacity(headers.len());
        for name in &headers {
            columns.push(DataProcessor::cell_labels(&head, name)?);
        }

        let rows = (0..head.height())
            .map(|i| {
                columns
                    .iter()
                    .map(|col| col[i].clone().unwrap_or_else(|| "None".to_string()))
                    .collect()
            })
            .collect();

        Ok(Self { headers, rows })
    }
}

/// Bivariate section content
#[derive(Debug, Clone)]
pub enum BivariateView {
    Charts(Vec<ChartData>),
    NotApplicable,
    Error(String),
}

/// Actions triggered by the viewer
#[derive(Debug, Clone)]
pub enum ChartViewerAction {
    None,
    SavePng(Box<ChartData>),
}

/// Scrollable dashboard area.
#[derive(Default)]
pub struct ChartViewer {
    pub overview: Option<DatasetOverview>,
    pub preview: TablePreview,
    /// Selected column and its chart (or build error)
    pub univariate: Option<(String, Result<ChartData, String>)>,
    pub bivariate: Option<BivariateView>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all content
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Heading of a bivariate chart card.
    pub fn caption(chart: &ChartData) -> String {
        let x = &chart.request.x;
        let y = chart.request.y.as_deref().unwrap_or_default();
        match chart.request.kind {
            ChartKind::Scatter => format!("Scatter plot between {x} and {y}"),
            ChartKind::Line => format!("Line plot between {x} and {y}"),
            ChartKind::Heatmap => format!("Heatmap between {x} and {y}"),
            ChartKind::Box => format!("Box plot of {y} by {x}"),
            ChartKind::Bar => format!("Bar plot of {y} by {x}"),
            _ => chart.title().to_string(),
        }
    }

    /// Draw the dashboard
    pub fn show(&mut self, ui: &mut egui::Ui) -> ChartViewerAction {
        let mut action = ChartViewerAction::None;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new("Titanic Data Analysis 🚢").size(26.0));
                ui.add_space(SECTION_SPACING);

                let Some(overview) = &self.overview else {
                    ui.centered_and_justified(|ui| {
                        ui.label(RichText::new("No Data").size(20.0));
                    });
                    return;
                };

                self.draw_preview(ui);
                ui.add_space(SECTION_SPACING);
                Self::draw_overview(ui, overview);

                if let Some((column, chart)) = &self.univariate {
                    ui.add_space(SECTION_SPACING);
                    ui.separator();
                    ui.heading(RichText::new("Univariate Analysis").underline());
                    ui.label(format!("Selected column: {column}"));
                    ui.add_space(8.0);
                    match chart {
                        Ok(chart) => {
                            if let Some(save) = Self::draw_chart_card(ui, chart.title(), chart) {
                                action = save;
                            }
                            if let ChartPayload::Pie(slices) = &chart.payload {
                                Self::draw_value_counts(ui, column, slices);
                            }
                        }
                        Err(e) => {
                            ui.colored_label(egui::Color32::from_rgb(220, 53, 69), e);
                        }
                    }
                }

                if let Some(view) = &self.bivariate {
                    ui.add_space(SECTION_SPACING);
                    ui.separator();
                    ui.heading("Titanic Dataset Bivariate Analysis");
                    ui.add_space(8.0);
                    match view {
                        BivariateView::Charts(charts) => {
                            for chart in charts {
                                let caption = Self::caption(chart);
                                if let Some(save) = Self::draw_chart_card(ui, &caption, chart) {
                                    action = save;
                                }
                                ui.add_space(SECTION_SPACING);
                            }
                        }
                        BivariateView::NotApplicable => {
                            ui.label(NOT_APPLICABLE_MESSAGE);
                        }
                        BivariateView::Error(e) => {
                            ui.colored_label(egui::Color32::from_rgb(220, 53, 69), e);
                        }
                    }
                }
            });

        action
    }

    fn draw_preview(&self, ui: &mut egui::Ui) {
        let preview = &self.preview;
        ScrollArea::both()
            .id_salt("dataset_preview")
            .max_height(PREVIEW_HEIGHT)
            .show_rows(ui, ROW_HEIGHT, preview.rows.len() + 1, |ui, row_range| {
                egui::Grid::new("dataset_preview_grid")
                    .striped(true)
                    .min_col_width(60.0)
                    .spacing([10.0, 2.0])
                    .show(ui, |ui| {
                        for row in row_range {
                            if row == 0 {
                                for header in &preview.headers {
                                    ui.label(RichText::new(header).strong());
                                }
                            } else if let Some(cells) = preview.rows.get(row - 1) {
                                for cell in cells {
                                    ui.label(cell);
                                }
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    fn draw_overview(ui: &mut egui::Ui, overview: &DatasetOverview) {
        ui.heading("Shape of data");
        ui.label(format!("Total passengers : {}", overview.row_count));
        ui.label(format!("Total columns : {}", overview.column_count));
        ui.add_space(10.0);

        ui.columns(2, |cols| {
            cols[0].label(RichText::new("Data Types").size(16.0).strong());
            Self::draw_two_column_table(
                &mut cols[0],
                "dtypes_table",
                ("Column", "Data Type"),
                overview.dtypes.iter().map(|(c, t)| (c.clone(), t.clone())),
            );

            cols[1].label(RichText::new("Null Values").size(16.0).strong());
            Self::draw_two_column_table(
                &mut cols[1],
                "nulls_table",
                ("Column", "Null Values"),
                overview
                    .null_counts
                    .iter()
                    .map(|(c, n)| (c.clone(), n.to_string())),
            );
        });
    }

    fn draw_two_column_table(
        ui: &mut egui::Ui,
        id: &str,
        headers: (&str, &str),
        rows: impl Iterator<Item = (String, String)>,
    ) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(id)
                    .striped(true)
                    .min_col_width(80.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new(headers.0).strong());
                        ui.label(RichText::new(headers.1).strong());
                        ui.end_row();
                        for (a, b) in rows {
                            ui.label(a);
                            ui.label(b);
                            ui.end_row();
                        }
                    });
            });
    }

    fn draw_value_counts(ui: &mut egui::Ui, column: &str, slices: &[PieSlice]) {
        ui.add_space(8.0);
        Self::draw_two_column_table(
            ui,
            "value_counts_table",
            (column, "Count"),
            slices.iter().map(|s| (s.label.clone(), s.count.to_string())),
        );
    }

    /// Draw one chart in a card under `heading`. Returns a save action when requested.
    fn draw_chart_card(
        ui: &mut egui::Ui,
        heading: &str,
        chart: &ChartData,
    ) -> Option<ChartViewerAction> {
        let mut action = None;
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(heading).size(16.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("💾 Save PNG").clicked() {
                            action = Some(ChartViewerAction::SavePng(Box::new(chart.clone())));
                        }
                    });
                });
                ui.add_space(8.0);
                ChartPlotter::draw(ui, chart);
            });
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn preview_renders_nulls_as_none() {
        let df = df!(
            "Sex" => ["male", "female", "female"],
            "Age" => [Some(22.0), None, Some(26.0)]
        )
        .unwrap();

        let preview = TablePreview::from_dataframe(&df, 2).unwrap();
        assert_eq!(preview.headers, vec!["Sex", "Age"]);
        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.rows[0][0], "male");
        assert_eq!(preview.rows[1][1], "None");
    }

    #[test]
    fn captions_follow_axis_roles() {
        use crate::charts::{select_bivariate, ChartBuilder};
        use crate::data::{ColumnInfo, ValueKind};

        let df = df!("Sex" => ["male", "female"], "Age" => [22.0, 38.0]).unwrap();
        let selection = select_bivariate(
            &ColumnInfo::new("Age", ValueKind::Numeric),
            &ColumnInfo::new("Sex", ValueKind::Categorical),
        );
        let charts = ChartBuilder::build_all(&df, selection.charts(), 10).unwrap();
        let captions: Vec<String> = charts.iter().map(ChartViewer::caption).collect();
        assert_eq!(captions, vec!["Box plot of Age by Sex", "Bar plot of Age by Sex"]);
    }
}
