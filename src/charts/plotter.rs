//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot and the egui painter.

use crate::charts::builder::{ChartData, ChartPayload, GroupBox, HistogramData, PieSlice};
use crate::charts::selector::ChartKind;
use crate::data::CrossTab;
use crate::stats::WordCount;
use egui::{Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke, Vec2};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Line, Plot, PlotPoints, Points};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Primary series color
pub const ACCENT_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

const PLOT_HEIGHT: f32 = 320.0;
/// Pie sectors are split into convex pieces no wider than this.
const MAX_SECTOR: f32 = FRAC_PI_2 / 2.0;

/// Draws chart data inside an egui Ui.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Draw any chart.
    pub fn draw(ui: &mut egui::Ui, chart: &ChartData) {
        let id = format!("{}_{}", chart.request.kind, chart.title());
        let x_label = chart.request.x.clone();
        let y_label = chart.request.y.clone().unwrap_or_else(|| "Count".to_string());

        match &chart.payload {
            ChartPayload::WordCloud(words) => Self::draw_word_cloud(ui, words),
            ChartPayload::Pie(slices) => Self::draw_pie(ui, slices),
            ChartPayload::Histogram(hist) => Self::draw_histogram(ui, &id, hist, &x_label),
            ChartPayload::Points(points) if chart.request.kind == ChartKind::Line => {
                Self::draw_line(ui, &id, points, &x_label, &y_label)
            }
            ChartPayload::Points(points) => {
                Self::draw_scatter(ui, &id, points, &x_label, &y_label)
            }
            ChartPayload::Box(groups) => Self::draw_box(ui, &id, groups, &x_label, &y_label),
            ChartPayload::Bar(sums) => Self::draw_bar(ui, &id, sums, &x_label, &y_label),
            ChartPayload::Heatmap(tab) => Self::draw_heatmap(ui, tab),
        }
    }

    /// Label categories placed at integer x positions.
    fn category_formatter(
        labels: Vec<String>,
    ) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
        move |mark: egui_plot::GridMark, _range: &std::ops::RangeInclusive<f64>| {
            let rounded = mark.value.round();
            if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            labels.get(rounded as usize).cloned().unwrap_or_default()
        }
    }

    /// Show a plot with axis labels; `categories` label integer x ticks.
    fn show_plot(
        ui: &mut egui::Ui,
        id: &str,
        x_label: &str,
        y_label: &str,
        categories: Option<Vec<String>>,
        add_contents: impl FnOnce(&mut egui_plot::PlotUi),
    ) {
        let mut plot = Plot::new(id.to_string())
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(x_label.to_string())
            .y_axis_label(y_label.to_string());
        if let Some(labels) = categories {
            plot = plot.x_axis_formatter(Self::category_formatter(labels));
        }
        plot.show(ui, add_contents);
    }

    fn draw_histogram(ui: &mut egui::Ui, id: &str, hist: &HistogramData, x_label: &str) {
        match hist {
            HistogramData::Bins(bins) => {
                let bars: Vec<Bar> = bins
                    .iter()
                    .map(|b| {
                        Bar::new(b.center(), b.count as f64)
                            .width(b.width())
                            .name(format!("{:.2} - {:.2}", b.start, b.end))
                    })
                    .collect();
                Self::show_plot(ui, id, x_label, "Count", None, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(bars).color(ACCENT_COLOR).name(x_label));
                });
            }
            HistogramData::Counts(counts) => {
                let labels: Vec<String> = counts.iter().map(|(l, _)| l.clone()).collect();
                let bars: Vec<Bar> = counts
                    .iter()
                    .enumerate()
                    .map(|(i, (label, n))| Bar::new(i as f64, *n as f64).width(0.8).name(label))
                    .collect();
                Self::show_plot(ui, id, x_label, "Count", Some(labels), |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(bars).color(ACCENT_COLOR).name(x_label));
                });
            }
        }
    }

    fn draw_scatter(
        ui: &mut egui::Ui,
        id: &str,
        points: &[(f64, f64)],
        x_label: &str,
        y_label: &str,
    ) {
        let plot_points: PlotPoints = points.iter().map(|&(x, y)| [x, y]).collect();
        Self::show_plot(ui, id, x_label, y_label, None, |plot_ui| {
            plot_ui.points(
                Points::new(plot_points)
                    .radius(2.5)
                    .color(ACCENT_COLOR.gamma_multiply(0.8))
                    .name(format!("{x_label} vs {y_label}")),
            );
        });
    }

    fn draw_line(ui: &mut egui::Ui, id: &str, points: &[(f64, f64)], x_label: &str, y_label: &str) {
        let plot_points: PlotPoints = points.iter().map(|&(x, y)| [x, y]).collect();
        Self::show_plot(ui, id, x_label, y_label, None, |plot_ui| {
            plot_ui.line(
                Line::new(plot_points)
                    .color(ACCENT_COLOR)
                    .width(1.2)
                    .name(format!("{x_label} vs {y_label}")),
            );
        });
    }

    fn draw_box(ui: &mut egui::Ui, id: &str, groups: &[GroupBox], x_label: &str, y_label: &str) {
        let labels: Vec<String> = groups.iter().map(|g| g.group.clone()).collect();
        Self::show_plot(ui, id, x_label, y_label, Some(labels), |plot_ui| {
            for (i, group) in groups.iter().enumerate() {
                let s = &group.stats;
                if s.count == 0 {
                    continue;
                }
                let color = Self::series_color(i);
                let elem = BoxElem::new(
                    i as f64,
                    BoxSpread::new(s.whisker_low, s.q1, s.median, s.q3, s.whisker_high),
                )
                .box_width(0.5)
                .fill(color.gamma_multiply(0.3))
                .stroke(Stroke::new(1.5, color))
                .name(&group.group);
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&group.group));

                if !s.outliers.is_empty() {
                    let outliers: PlotPoints =
                        s.outliers.iter().map(|&v| [i as f64, v]).collect();
                    plot_ui.points(
                        Points::new(outliers)
                            .radius(2.5)
                            .color(color)
                            .name(format!("{} outliers", group.group)),
                    );
                }
            }
        });
    }

    fn draw_bar(ui: &mut egui::Ui, id: &str, sums: &[(String, f64)], x_label: &str, y_label: &str) {
        let labels: Vec<String> = sums.iter().map(|(l, _)| l.clone()).collect();
        let bars: Vec<Bar> = sums
            .iter()
            .enumerate()
            .map(|(i, (label, sum))| {
                Bar::new(i as f64, *sum)
                    .width(0.7)
                    .fill(Self::series_color(i))
                    .name(label)
            })
            .collect();
        Self::show_plot(ui, id, x_label, y_label, Some(labels), |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(y_label));
        });
    }

    fn draw_pie(ui: &mut egui::Ui, slices: &[PieSlice]) {
        let total: usize = slices.iter().map(|s| s.count).sum();
        if total == 0 {
            ui.label("No values to plot");
            return;
        }

        let width = ui.available_width().min(640.0);
        let (response, painter) = ui.allocate_painter(Vec2::new(width, PLOT_HEIGHT), Sense::hover());
        let rect = response.rect;
        let radius = (PLOT_HEIGHT / 2.0 - 10.0).min(width / 3.0);
        let center = Pos2::new(rect.left() + radius + 10.0, rect.center().y);

        let mut angle = -FRAC_PI_2;
        for (i, slice) in slices.iter().enumerate() {
            let color = Self::series_color(i);
            let sweep = slice.count as f32 / total as f32 * TAU;

            // Split into convex pieces
            let pieces = (sweep / MAX_SECTOR).ceil().max(1.0) as usize;
            let step = sweep / pieces as f32;
            for p in 0..pieces {
                let start = angle + p as f32 * step;
                let arc_steps = 8;
                let mut points = vec![center];
                for k in 0..=arc_steps {
                    let a = start + step * k as f32 / arc_steps as f32;
                    points.push(center + radius * Vec2::angled(a));
                }
                painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
            }

            let mid = angle + sweep / 2.0;
            let pct = slice.count as f32 / total as f32 * 100.0;
            if pct >= 3.0 {
                painter.text(
                    center + radius * 0.65 * Vec2::angled(mid),
                    Align2::CENTER_CENTER,
                    format!("{pct:.1}%"),
                    FontId::proportional(12.0),
                    Color32::WHITE,
                );
            }
            angle += sweep;
        }

        // Legend
        let text_color = ui.visuals().text_color();
        let legend_x = center.x + radius + 30.0;
        let mut legend_y = rect.top() + 20.0;
        for (i, slice) in slices.iter().enumerate() {
            let swatch = egui::Rect::from_min_size(Pos2::new(legend_x, legend_y), Vec2::splat(12.0));
            painter.rect_filled(swatch, 2.0, Self::series_color(i));
            painter.text(
                Pos2::new(legend_x + 18.0, legend_y + 6.0),
                Align2::LEFT_CENTER,
                format!("{} ({})", slice.label, slice.count),
                FontId::proportional(13.0),
                text_color,
            );
            legend_y += 20.0;
        }
    }

    fn heat_color(count: usize, max: usize) -> Color32 {
        let t = if max == 0 { 0.0 } else { count as f32 / max as f32 };
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color32::from_rgb(lerp(240, 13), lerp(249, 71), lerp(33, 161))
    }

    fn draw_heatmap(ui: &mut egui::Ui, tab: &CrossTab) {
        let (rows, cols) = tab.dimensions();
        if rows == 0 || cols == 0 {
            ui.label("No values to plot");
            return;
        }

        let label_w = 110.0;
        let label_h = 24.0;
        let width = ui.available_width().min(720.0);
        let cell_w = ((width - label_w) / cols as f32).max(12.0);
        let cell_h = ((PLOT_HEIGHT - label_h) / rows as f32).clamp(12.0, 60.0);
        let size = Vec2::new(label_w + cell_w * cols as f32, label_h + cell_h * rows as f32);
        let (response, painter) = ui.allocate_painter(size, Sense::hover());
        let origin = response.rect.min;

        let max = tab.max_count();
        let text_color = ui.visuals().text_color();
        let font = FontId::proportional(11.0);

        for (r, row_label) in tab.row_labels.iter().enumerate() {
            let y = origin.y + r as f32 * cell_h;
            painter.text(
                Pos2::new(origin.x + label_w - 6.0, y + cell_h / 2.0),
                Align2::RIGHT_CENTER,
                row_label,
                font.clone(),
                text_color,
            );
            for c in 0..cols {
                let count = tab.counts[r][c];
                let cell = egui::Rect::from_min_size(
                    Pos2::new(origin.x + label_w + c as f32 * cell_w, y),
                    Vec2::new(cell_w, cell_h),
                );
                let fill = Self::heat_color(count, max);
                painter.rect_filled(cell, 0.0, fill);
                if cell_w >= 24.0 && cell_h >= 14.0 {
                    let ink = if count * 2 > max { Color32::WHITE } else { Color32::BLACK };
                    painter.text(cell.center(), Align2::CENTER_CENTER, count.to_string(), font.clone(), ink);
                }
            }
        }

        let bottom = origin.y + rows as f32 * cell_h + 4.0;
        for (c, col_label) in tab.col_labels.iter().enumerate() {
            painter.text(
                Pos2::new(origin.x + label_w + (c as f32 + 0.5) * cell_w, bottom),
                Align2::CENTER_TOP,
                col_label,
                font.clone(),
                text_color,
            );
        }
    }

    fn draw_word_cloud(ui: &mut egui::Ui, words: &[WordCount]) {
        let Some(max) = words.iter().map(|w| w.count).max() else {
            ui.label("No words to plot");
            return;
        };

        egui::Frame::none()
            .fill(Color32::BLACK)
            .rounding(5.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for (i, word) in words.iter().enumerate() {
                        let weight = (word.count as f32 / max as f32).sqrt();
                        let size = 11.0 + 37.0 * weight;
                        ui.label(
                            RichText::new(&word.word)
                                .size(size)
                                .color(Self::series_color(i)),
                        )
                        .on_hover_text(format!("{}: {}", word.word, word.count));
                    }
                });
            });
    }
}
