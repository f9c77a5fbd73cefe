//! Server-side SVG drawing for [`Chart`] models, on the plotters SVG backend.
//!
//! Every chart becomes one self-contained `<svg>` element: white background,
//! light horizontal grid, caption and axis descriptions, plus a legend for
//! bar charts. The category axis is continuous with one unit per category,
//! centered on whole numbers, so boxes and bar clusters keep exact widths.

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::FontTransform;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{BarChart, BoxChart, Chart, ChartLayout};
use crate::error::{InsightsError, Result};

const FONT: &str = "sans-serif";
const TEXT_COLOR: RGBColor = RGBColor(0x2a, 0x3f, 0x5f);
const GRID_COLOR: RGBColor = RGBColor(0xeb, 0xf0, 0xf8);
const FALLBACK_COLOR: RGBColor = RGBColor(0x63, 0x6e, 0xfa);

/// Half the width of a box, in category units.
const BOX_HALF_WIDTH: f64 = 0.25;
/// Half the width of a whisker cap, in category units.
const CAP_HALF_WIDTH: f64 = 0.12;
/// Share of a category slot taken by its bar cluster.
const BAR_CLUSTER_WIDTH: f64 = 0.8;
/// Longest category label before it is cut with an ellipsis.
const MAX_LABEL_CHARS: usize = 18;

type DrawResult<DB> = std::result::Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Draw `chart` on a `width` x `height` canvas.
pub fn render_chart(chart: &Chart, width: u32, height: u32) -> Result<String> {
    let mut svg_buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut svg_buffer, (width, height)).into_drawing_area();
        let drawn = match chart {
            Chart::Box(chart) => draw_box_chart(&root, chart),
            Chart::Bar(chart) => draw_bar_chart(&root, chart),
        };
        drawn
            .and_then(|()| root.present())
            .map_err(|e| InsightsError::Render(e.to_string()))?;
    }
    Ok(svg_buffer)
}

// ============================================================================
// Box charts
// ============================================================================

fn draw_box_chart<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, chart: &BoxChart) -> DrawResult<DB> {
    root.fill(&WHITE)?;
    if chart.groups.is_empty() {
        return draw_empty(root, &chart.layout);
    }

    let labels: Vec<&str> = chart.groups.iter().map(|g| g.label.as_str()).collect();
    let lo = chart.groups.iter().map(|g| g.stats.min).fold(f64::INFINITY, f64::min);
    let hi = chart.groups.iter().map(|g| g.stats.max).fold(f64::NEG_INFINITY, f64::max);
    let (y_lo, y_hi) = padded_range(lo, hi);

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.layout.title, (FONT, 20, &TEXT_COLOR))
        .margin(16)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(category_range(labels.len()), y_lo..y_hi)?;

    let prefix = chart.layout.tick_prefix.as_deref().unwrap_or("");
    let x_formatter = |x: &f64| category_label(&labels, *x);
    let y_formatter = |y: &f64| format!("{prefix}{}", tick_value(*y));
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .x_desc(chart.layout.x_title.as_str())
        .y_desc(chart.layout.y_title.as_str())
        .label_style((FONT, 12, &TEXT_COLOR))
        .axis_desc_style((FONT, 14, &TEXT_COLOR))
        .bold_line_style(&GRID_COLOR)
        .light_line_style(&WHITE)
        .draw()?;

    let color = parse_hex_color(&chart.color);
    let stroke = color.stroke_width(2);

    for (idx, group) in chart.groups.iter().enumerate() {
        let x = idx as f64;
        let stats = &group.stats;
        let (left, right) = (x - BOX_HALF_WIDTH, x + BOX_HALF_WIDTH);

        ctx.draw_series([
            PathElement::new(vec![(x, stats.lower_whisker), (x, stats.q1)], stroke),
            PathElement::new(vec![(x, stats.q3), (x, stats.upper_whisker)], stroke),
            PathElement::new(
                vec![(x - CAP_HALF_WIDTH, stats.lower_whisker), (x + CAP_HALF_WIDTH, stats.lower_whisker)],
                stroke,
            ),
            PathElement::new(
                vec![(x - CAP_HALF_WIDTH, stats.upper_whisker), (x + CAP_HALF_WIDTH, stats.upper_whisker)],
                stroke,
            ),
        ])?;
        ctx.draw_series([
            Rectangle::new([(left, stats.q3), (right, stats.q1)], color.mix(0.5).filled()),
            Rectangle::new([(left, stats.q3), (right, stats.q1)], stroke),
        ])?;
        ctx.draw_series(std::iter::once(PathElement::new(
            vec![(left, stats.median), (right, stats.median)],
            color.stroke_width(3),
        )))?;
        ctx.draw_series(stats.outliers.iter().map(|value| Circle::new((x, *value), 3, stroke)))?;
    }

    Ok(())
}

// ============================================================================
// Bar charts
// ============================================================================

fn draw_bar_chart<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, chart: &BarChart) -> DrawResult<DB> {
    root.fill(&WHITE)?;
    if chart.categories.is_empty() {
        return draw_empty(root, &chart.layout);
    }

    let categories: Vec<&str> = chart.categories.iter().map(String::as_str).collect();
    let (lo, hi) = chart
        .series
        .iter()
        .flat_map(|s| s.values.iter().flatten().copied())
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    // Headroom for the value labels and the legend.
    let (y_lo, y_hi) = if hi - lo < f64::EPSILON {
        (0.0, 1.0)
    } else {
        (lo * 1.15, hi * 1.3)
    };

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.layout.title, (FONT, 20, &TEXT_COLOR))
        .margin(16)
        .x_label_area_size(130)
        .y_label_area_size(70)
        .build_cartesian_2d(category_range(categories.len()), y_lo..y_hi)?;

    let x_formatter = |x: &f64| category_label(&categories, *x);
    let y_formatter = |y: &f64| tick_value(*y);
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(categories.len())
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .x_label_style(
            (FONT, 11)
                .into_font()
                .transform(FontTransform::Rotate90)
                .color(&TEXT_COLOR),
        )
        .x_desc(chart.layout.x_title.as_str())
        .y_desc(chart.layout.y_title.as_str())
        .label_style((FONT, 12, &TEXT_COLOR))
        .axis_desc_style((FONT, 14, &TEXT_COLOR))
        .bold_line_style(&GRID_COLOR)
        .light_line_style(&WHITE)
        .draw()?;

    // Legend heading: a series with no elements.
    ctx.draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())?
        .label(chart.legend_title.as_str())
        .legend(|(x, y)| EmptyElement::at((x, y)));

    let bar_width = BAR_CLUSTER_WIDTH / chart.series.len().max(1) as f64;
    for (series_idx, series) in chart.series.iter().enumerate() {
        let color = parse_hex_color(&series.color);
        let offset = -BAR_CLUSTER_WIDTH / 2.0 + bar_width * series_idx as f64;

        let bars = series.values.iter().enumerate().filter_map(|(idx, value)| {
            let value = (*value)?;
            let left = idx as f64 + offset;
            Some(Rectangle::new([(left, 0.0), (left + bar_width, value)], color.filled()))
        });
        ctx.draw_series(bars)?
            .label(series.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));

        let labels = series
            .values
            .iter()
            .zip(&series.labels)
            .enumerate()
            .filter_map(|(idx, (value, label))| {
                let value = (*value)?;
                let anchor = if value >= 0.0 { VPos::Bottom } else { VPos::Top };
                let style = (FONT, 10)
                    .into_font()
                    .color(&TEXT_COLOR)
                    .pos(Pos::new(HPos::Center, anchor));
                Some(Text::new(
                    label.clone(),
                    (idx as f64 + offset + bar_width / 2.0, value),
                    style,
                ))
            });
        ctx.draw_series(labels)?;
    }

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font((FONT, 12, &TEXT_COLOR))
        .background_style(&WHITE.mix(0.85))
        .border_style(&GRID_COLOR)
        .draw()
}

// ============================================================================
// Shared pieces
// ============================================================================

fn draw_empty<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, layout: &ChartLayout) -> DrawResult<DB> {
    let area = root.titled(&layout.title, (FONT, 20).into_font().color(&TEXT_COLOR))?;
    let (width, height) = area.dim_in_pixel();
    let style = (FONT, 14)
        .into_font()
        .color(&TEXT_COLOR)
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new("No data", (width as i32 / 2, height as i32 / 2), style))
}

/// One unit per category, category `i` centered on `i`.
fn category_range(count: usize) -> std::ops::Range<f64> {
    -0.5..(count.max(1) as f64 - 0.5)
}

/// `lo..hi` with 5% padding on each side; never empty.
fn padded_range(lo: f64, hi: f64) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if hi - lo < f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

/// Label for a category-axis key point. Only whole positions carry a label.
fn category_label(categories: &[&str], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    categories
        .get(idx as usize)
        .map(|label| truncate_label(label, MAX_LABEL_CHARS))
        .unwrap_or_default()
}

/// Value-axis tick text without float noise or "-0".
fn tick_value(value: f64) -> String {
    let rounded = (value * 1e6).round() / 1e6 + 0.0;
    format!("{rounded}")
}

fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        let kept: String = label.chars().take(max_chars - 1).collect();
        format!("{kept}…")
    }
}

/// `#rrggbb` to a plotters color. Anything else falls back to the first
/// palette color.
fn parse_hex_color(hex: &str) -> RGBColor {
    let digits = hex.trim_start_matches('#');
    let channel = |at: usize| digits.get(at..at + 2).and_then(|c| u8::from_str_radix(c, 16).ok());
    match (digits.len(), channel(0), channel(2), channel(4)) {
        (6, Some(r), Some(g), Some(b)) => RGBColor(r, g, b),
        _ => FALLBACK_COLOR,
    }
}
