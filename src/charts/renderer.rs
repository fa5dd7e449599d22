//! Static Chart Renderer
//! Renders chart data to PNG bytes with plotters, for saving outside the app.
//!
//! Layout per chart:
//! 1. Caption: the chart title
//! 2. Plot area with axis descriptions taken from the x/y columns
//! 3. Category labels under discrete x axes

use crate::charts::builder::{ChartData, ChartPayload, GroupBox, HistogramData, PieSlice};
use crate::charts::selector::ChartKind;
use crate::data::CrossTab;
use crate::stats::{HistogramBin, WordCount};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),
    #[error("Nothing to draw for {0}")]
    Empty(String),
    #[error("Bitmap buffer does not match {0}x{1}")]
    Buffer(u32, u32),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

// Colors
const ACCENT: RGBColor = RGBColor(52, 152, 219);
const PALETTE: [RGBColor; 10] = [
    RGBColor(52, 152, 219),
    RGBColor(231, 76, 60),
    RGBColor(46, 204, 113),
    RGBColor(155, 89, 182),
    RGBColor(243, 156, 18),
    RGBColor(26, 188, 156),
    RGBColor(233, 30, 99),
    RGBColor(0, 188, 212),
    RGBColor(121, 85, 72),
    RGBColor(96, 125, 139),
];
const HEAT_LOW: RGBColor = RGBColor(240, 249, 33);
const HEAT_HIGH: RGBColor = RGBColor(13, 71, 161);

const FONT: &str = "sans-serif";
/// Words drawn in a static word cloud.
const STATIC_CLOUD_WORDS: usize = 80;

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a chart to PNG-encoded bytes.
    pub fn render_png(chart: &ChartData, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        let rgb = Self::render_rgb(chart, width, height)?;
        let img = image::RgbImage::from_raw(width, height, rgb)
            .ok_or(RenderError::Buffer(width, height))?;

        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Render a chart and write it as a PNG file.
    pub fn save_png(chart: &ChartData, path: &Path, width: u32, height: u32) -> Result<(), RenderError> {
        let bytes = Self::render_png(chart, width, height)?;
        std::fs::write(path, bytes)?;
        log::info!("saved {} to {}", chart.title(), path.display());
        Ok(())
    }

    fn render_rgb(chart: &ChartData, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        if Self::is_empty(&chart.payload) {
            return Err(RenderError::Empty(chart.title().to_string()));
        }

        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;
            Self::draw(&root, chart)?;
            root.present().map_err(draw_err)?;
        }
        Ok(buffer)
    }

    fn is_empty(payload: &ChartPayload) -> bool {
        match payload {
            ChartPayload::WordCloud(words) => words.is_empty(),
            ChartPayload::Pie(slices) => slices.iter().all(|s| s.count == 0),
            ChartPayload::Histogram(HistogramData::Bins(bins)) => bins.is_empty(),
            ChartPayload::Histogram(HistogramData::Counts(counts)) => counts.is_empty(),
            ChartPayload::Points(points) => points.is_empty(),
            ChartPayload::Box(groups) => groups.iter().all(|g| g.stats.count == 0),
            ChartPayload::Bar(sums) => sums.is_empty(),
            ChartPayload::Heatmap(tab) => tab.row_labels.is_empty() || tab.col_labels.is_empty(),
        }
    }

    fn draw(root: &Area<'_>, chart: &ChartData) -> Result<(), RenderError> {
        let title = chart.title();
        let x = chart.request.x.as_str();
        let y = chart.request.y.as_deref().unwrap_or("Count");

        match &chart.payload {
            ChartPayload::WordCloud(words) => Self::draw_word_cloud(root, title, words),
            ChartPayload::Pie(slices) => Self::draw_pie(root, title, slices),
            ChartPayload::Histogram(HistogramData::Bins(bins)) => {
                Self::draw_bins(root, title, x, bins)
            }
            ChartPayload::Histogram(HistogramData::Counts(counts)) => {
                let values: Vec<(String, f64)> =
                    counts.iter().map(|(l, n)| (l.clone(), *n as f64)).collect();
                Self::draw_category_bars(root, title, x, "Count", &values)
            }
            ChartPayload::Points(points) => {
                Self::draw_points(root, title, x, y, points, chart.request.kind == ChartKind::Line)
            }
            ChartPayload::Box(groups) => Self::draw_box(root, title, x, y, groups),
            ChartPayload::Bar(sums) => Self::draw_category_bars(root, title, x, y, sums),
            ChartPayload::Heatmap(tab) => Self::draw_heatmap(root, title, x, y, tab),
        }
    }

    /// Pad a value range by 5%, widening degenerate ranges.
    fn padded_range(min: f64, max: f64) -> (f64, f64) {
        if !min.is_finite() || !max.is_finite() {
            return (0.0, 1.0);
        }
        if max == min {
            return (min - 1.0, max + 1.0);
        }
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }

    fn heat_color(count: usize, max: usize) -> RGBColor {
        let t = if max == 0 { 0.0 } else { count as f64 / max as f64 };
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        RGBColor(
            lerp(HEAT_LOW.0, HEAT_HIGH.0),
            lerp(HEAT_LOW.1, HEAT_HIGH.1),
            lerp(HEAT_LOW.2, HEAT_HIGH.2),
        )
    }

    /// Data row drawn at segment `y` of a heatmap whose y axis grows upward.
    fn heatmap_row(rows: usize, y: usize) -> Option<usize> {
        (y < rows).then(|| rows - 1 - y)
    }

    fn draw_bins(root: &Area<'_>, title: &str, x: &str, bins: &[HistogramBin]) -> Result<(), RenderError> {
        let x_start = bins.first().map(|b| b.start).unwrap_or(0.0);
        let x_end = bins.last().map(|b| b.end).unwrap_or(1.0);
        let y_max = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64 * 1.1 + 1.0;

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(55)
            .build_cartesian_2d(x_start..x_end, 0f64..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(x)
            .y_desc("Count")
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(bins.iter().map(|b| {
                Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], ACCENT.filled())
            }))
            .map_err(draw_err)?;
        chart
            .draw_series(bins.iter().map(|b| {
                Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], WHITE.stroke_width(1))
            }))
            .map_err(draw_err)?;

        Ok(())
    }

    fn draw_category_bars(
        root: &Area<'_>,
        title: &str,
        x: &str,
        y: &str,
        values: &[(String, f64)],
    ) -> Result<(), RenderError> {
        let labels: Vec<String> = values.iter().map(|(l, _)| l.clone()).collect();
        let y_min = values.iter().map(|(_, v)| *v).fold(0.0, f64::min);
        let y_max = values.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        let (_, y_top) = Self::padded_range(y_min, y_max);

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d((0..values.len() as i32).into_segmented(), y_min..y_top)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(x)
            .y_desc(y)
            .x_labels(labels.len())
            .x_label_formatter(&|v: &SegmentValue<i32>| match v {
                SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(ACCENT.filled())
                    .margin(10)
                    .data(values.iter().enumerate().map(|(i, (_, v))| (i as i32, *v))),
            )
            .map_err(draw_err)?;

        Ok(())
    }

    fn draw_points(
        root: &Area<'_>,
        title: &str,
        x: &str,
        y: &str,
        points: &[(f64, f64)],
        as_line: bool,
    ) -> Result<(), RenderError> {
        let x_min = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let x_max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let y_min = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let y_max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let (x0, x1) = Self::padded_range(x_min, x_max);
        let (y0, y1) = Self::padded_range(y_min, y_max);

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc(x)
            .y_desc(y)
            .draw()
            .map_err(draw_err)?;

        if as_line {
            chart
                .draw_series(LineSeries::new(points.iter().copied(), ACCENT.stroke_width(2)))
                .map_err(draw_err)?;
        } else {
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&p| Circle::new(p, 3, ACCENT.mix(0.7).filled())),
                )
                .map_err(draw_err)?;
        }

        Ok(())
    }

    fn draw_box(
        root: &Area<'_>,
        title: &str,
        x: &str,
        y: &str,
        groups: &[GroupBox],
    ) -> Result<(), RenderError> {
        let labels: Vec<String> = groups.iter().map(|g| g.group.clone()).collect();
        let drawn: Vec<(usize, &GroupBox)> = groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.stats.count > 0)
            .collect();

        let lows = drawn.iter().flat_map(|(_, g)| {
            std::iter::once(g.stats.whisker_low).chain(g.stats.outliers.iter().copied())
        });
        let y_min = lows.fold(f64::INFINITY, f64::min);
        let highs = drawn.iter().flat_map(|(_, g)| {
            std::iter::once(g.stats.whisker_high).chain(g.stats.outliers.iter().copied())
        });
        let y_max = highs.fold(f64::NEG_INFINITY, f64::max);
        let (y0, y1) = Self::padded_range(y_min, y_max);

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..groups.len() as f64 - 0.5, y0..y1)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(x)
            .y_desc(y)
            .x_labels(groups.len() + 1)
            .x_label_formatter(&|v: &f64| {
                let rounded = v.round();
                if (v - rounded).abs() > 1e-6 || rounded < 0.0 {
                    return String::new();
                }
                labels.get(rounded as usize).cloned().unwrap_or_default()
            })
            .draw()
            .map_err(draw_err)?;

        for (i, group) in drawn {
            let s = &group.stats;
            let color = PALETTE[i % PALETTE.len()];
            let cx = i as f64;
            let half = 0.25;

            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(cx - half, s.q1), (cx + half, s.q3)],
                    color.mix(0.3).filled(),
                )))
                .map_err(draw_err)?;
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(cx - half, s.q1), (cx + half, s.q3)],
                    color.stroke_width(2),
                )))
                .map_err(draw_err)?;

            let segments = [
                [(cx - half, s.median), (cx + half, s.median)],
                [(cx, s.whisker_low), (cx, s.q1)],
                [(cx, s.q3), (cx, s.whisker_high)],
                [(cx - half / 2.0, s.whisker_low), (cx + half / 2.0, s.whisker_low)],
                [(cx - half / 2.0, s.whisker_high), (cx + half / 2.0, s.whisker_high)],
            ];
            chart
                .draw_series(
                    segments
                        .iter()
                        .map(|seg| PathElement::new(seg.to_vec(), color.stroke_width(2))),
                )
                .map_err(draw_err)?;

            chart
                .draw_series(
                    s.outliers
                        .iter()
                        .map(|&v| Circle::new((cx, v), 3, color.filled())),
                )
                .map_err(draw_err)?;
        }

        Ok(())
    }

    fn draw_heatmap(
        root: &Area<'_>,
        title: &str,
        x: &str,
        y: &str,
        tab: &CrossTab,
    ) -> Result<(), RenderError> {
        let (rows, cols) = tab.dimensions();
        let max = tab.max_count();

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(90)
            .build_cartesian_2d(
                (0..cols as i32).into_segmented(),
                (0..rows as i32).into_segmented(),
            )
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(y)
            .y_desc(x)
            .x_labels(cols)
            .y_labels(rows)
            .x_label_formatter(&|v: &SegmentValue<i32>| match v {
                SegmentValue::CenterOf(i) => {
                    tab.col_labels.get(*i as usize).cloned().unwrap_or_default()
                }
                _ => String::new(),
            })
            .y_label_formatter(&|v: &SegmentValue<i32>| match v {
                SegmentValue::CenterOf(i) => usize::try_from(*i)
                    .ok()
                    .and_then(|i| Self::heatmap_row(rows, i))
                    .and_then(|r| tab.row_labels.get(r).cloned())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .draw()
            .map_err(draw_err)?;

        // First row on top, matching the on-screen heatmap.
        let cells: Vec<(i32, i32, usize)> = (0..rows)
            .flat_map(|r| {
                let y = (rows - 1 - r) as i32;
                (0..cols).map(move |c| (y, c as i32, tab.counts[r][c]))
            })
            .collect();

        chart
            .draw_series(cells.iter().map(|&(r, c, count)| {
                Rectangle::new(
                    [
                        (SegmentValue::Exact(c), SegmentValue::Exact(r)),
                        (SegmentValue::Exact(c + 1), SegmentValue::Exact(r + 1)),
                    ],
                    Self::heat_color(count, max).filled(),
                )
            }))
            .map_err(draw_err)?;

        chart
            .draw_series(cells.iter().map(|&(r, c, count)| {
                let ink = if count * 2 > max { WHITE } else { BLACK };
                Text::new(
                    count.to_string(),
                    (SegmentValue::CenterOf(c), SegmentValue::CenterOf(r)),
                    (FONT, 16).into_font().color(&ink),
                )
            }))
            .map_err(draw_err)?;

        Ok(())
    }

    fn draw_pie(root: &Area<'_>, title: &str, slices: &[PieSlice]) -> Result<(), RenderError> {
        let area = root.titled(title, (FONT, 24)).map_err(draw_err)?;
        let (w, h) = area.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = (w.min(h) as f64 / 2.0 - 40.0).max(10.0);

        let total: usize = slices.iter().map(|s| s.count).sum();
        let sizes: Vec<f64> = slices.iter().map(|s| s.count as f64).collect();
        let colors: Vec<RGBColor> = (0..slices.len()).map(|i| PALETTE[i % PALETTE.len()]).collect();
        let labels: Vec<String> = slices
            .iter()
            .map(|s| format!("{} ({:.1}%)", s.label, s.count as f64 / total as f64 * 100.0))
            .collect();

        let pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        area.draw(&pie).map_err(draw_err)?;
        Ok(())
    }

    fn draw_word_cloud(root: &Area<'_>, title: &str, words: &[WordCount]) -> Result<(), RenderError> {
        let area = root.titled(title, (FONT, 24)).map_err(draw_err)?;
        let (w, h) = area.dim_in_pixel();
        let max = words.iter().map(|w| w.count).max().unwrap_or(1) as f64;

        let margin = 10i32;
        let mut cursor = (margin, margin);
        let mut line_height = 0i32;

        for (i, word) in words.iter().take(STATIC_CLOUD_WORDS).enumerate() {
            let size = 12.0 + 48.0 * (word.count as f64 / max).sqrt();
            // Rough advance width for proportional fonts
            let advance = (word.word.chars().count() as f64 * size * 0.6) as i32 + 12;

            if cursor.0 + advance > w as i32 - margin && cursor.0 > margin {
                cursor = (margin, cursor.1 + line_height + 6);
                line_height = 0;
            }
            if cursor.1 + size as i32 > h as i32 - margin {
                break;
            }

            let style = (FONT, size).into_font().color(&PALETTE[i % PALETTE.len()]);
            area.draw(&Text::new(word.word.clone(), cursor, style))
                .map_err(draw_err)?;

            cursor.0 += advance;
            line_height = line_height.max(size as i32);
        }

        Ok(())
    }
}
