//! Chart models.
//!
//! Pages produce [`Chart`] values: plain data (groups, bars, labels, styling)
//! that serialize to JSON for the API and are drawn to SVG by [`svg`].

pub mod svg;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use crate::aggregation::{BoxStats, metric_by_review_category, top_groups_by_delay};
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::types::{GroupKey, Metric};

/// Default qualitative palette, one color per metric in [`Metric::ALL`] order.
pub const METRIC_PALETTE: [&str; 3] = ["#636efa", "#EF553B", "#00cc96"];

/// Titles and axis decoration shared by every chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    /// Printed before every value-axis tick label, e.g. `"R$ "`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_prefix: Option<String>,
}

/// One box per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxChart {
    pub layout: ChartLayout,
    pub color: String,
    pub groups: Vec<BoxGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxGroup {
    pub label: String,
    pub stats: BoxStats,
    /// Raw values of the group, in table order.
    pub points: Vec<f64>,
}

/// Clusters of bars, one cluster per category and one bar per series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub layout: ChartLayout,
    pub legend_title: String,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub name: String,
    pub color: String,
    /// One entry per category; `None` draws no bar.
    pub values: Vec<Option<f64>>,
    /// Text printed above each bar.
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Box(BoxChart),
    Bar(BarChart),
}

impl Chart {
    pub fn layout(&self) -> &ChartLayout {
        match self {
            Self::Box(chart) => &chart.layout,
            Self::Bar(chart) => &chart.layout,
        }
    }

    /// Whether there is anything to draw.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Box(chart) => chart.groups.is_empty(),
            Self::Bar(chart) => chart.categories.is_empty(),
        }
    }
}

// ============================================================================
// Chart line-up styling
// ============================================================================

/// Fixed styling of a metric-by-review-category box chart.
#[derive(Debug, Clone, Copy)]
pub struct BoxChartSpec {
    pub metric: Metric,
    pub title: &'static str,
    pub y_title: &'static str,
    pub color: &'static str,
    pub tick_prefix: Option<&'static str>,
}

/// Fixed styling of a "top N groups" bar chart.
#[derive(Debug, Clone, Copy)]
pub struct TopGroupsChartSpec {
    pub key: GroupKey,
    pub title: &'static str,
    pub x_title: &'static str,
}

/// Value label printed above a bar: one decimal place.
pub fn value_label(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.1}")).unwrap_or_default()
}

/// Box chart of `spec.metric` grouped by review category.
pub fn build_box_chart(df: &DataFrame, spec: &BoxChartSpec, config: &DashboardConfig) -> Result<BoxChart> {
    let groups = metric_by_review_category(df, spec.metric)?
        .into_iter()
        .filter_map(|(category, points)| {
            BoxStats::from_values(&points, config.whisker_iqr_factor).map(|stats| BoxGroup {
                label: category.as_str().to_string(),
                stats,
                points,
            })
        })
        .collect();

    Ok(BoxChart {
        layout: ChartLayout {
            title: spec.title.to_string(),
            x_title: "Review Category".to_string(),
            y_title: spec.y_title.to_string(),
            tick_prefix: spec.tick_prefix.map(str::to_string),
        },
        color: spec.color.to_string(),
        groups,
    })
}

/// Grouped bar chart of the worst `config.top_n` groups by mean delay.
pub fn build_top_groups_chart(
    df: &DataFrame,
    spec: &TopGroupsChartSpec,
    config: &DashboardConfig,
) -> Result<BarChart> {
    let groups = top_groups_by_delay(df, spec.key, config.top_n)?;

    let series = Metric::ALL
        .iter()
        .zip(METRIC_PALETTE)
        .map(|(metric, color)| {
            let values: Vec<Option<f64>> = groups.iter().map(|g| g.metric(*metric)).collect();
            BarSeries {
                name: metric.column().to_string(),
                color: color.to_string(),
                labels: values.iter().map(|v| value_label(*v)).collect(),
                values,
            }
        })
        .collect();

    Ok(BarChart {
        layout: ChartLayout {
            title: spec.title.to_string(),
            x_title: spec.x_title.to_string(),
            y_title: "Avg Value".to_string(),
            tick_prefix: None,
        },
        legend_title: "Metric".to_string(),
        categories: groups.into_iter().map(|g| g.key).collect(),
        series,
    })
}
