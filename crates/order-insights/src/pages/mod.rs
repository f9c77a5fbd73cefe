//! Page router.
//!
//! [`render_page`] is the single entry point: given the selected [`Page`],
//! the session's [`DatasetState`] and the config, it returns a [`PageView`]
//! made of ordered [`Block`]s. It holds no state and caches nothing, so
//! every call recomputes the charts from the dataset.

pub mod content;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::charts::{
    BoxChartSpec, Chart, TopGroupsChartSpec, build_box_chart, build_top_groups_chart,
};
use crate::config::DashboardConfig;
use crate::error::{InsightsError, Result};
use crate::loader::DatasetState;
use crate::types::{GroupKey, Metric};

// ============================================================================
// Pages
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    #[default]
    Welcome,
    UnderstandingTheProblem,
    FactorsAndCauses,
    ConclusionAndInsights,
}

impl Page {
    /// Sidebar order.
    pub const ALL: [Page; 4] = [
        Self::Welcome,
        Self::UnderstandingTheProblem,
        Self::FactorsAndCauses,
        Self::ConclusionAndInsights,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::UnderstandingTheProblem => "Understanding the Problem",
            Self::FactorsAndCauses => "Factors and Causes",
            Self::ConclusionAndInsights => "Conclusion and Insights",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::UnderstandingTheProblem => "understanding-the-problem",
            Self::FactorsAndCauses => "factors-and-causes",
            Self::ConclusionAndInsights => "conclusion-and-insights",
        }
    }

    /// Heading printed at the top of the page.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Welcome => content::WELCOME_TITLE,
            Self::ConclusionAndInsights => content::CONCLUSION_TITLE,
            other => other.display_name(),
        }
    }

    pub fn requires_dataset(&self) -> bool {
        !matches!(self, Self::Welcome)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Page {
    type Err = InsightsError;

    /// Accepts slugs and display names, ignoring case and surrounding space.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|page| {
                page.slug().eq_ignore_ascii_case(wanted) || page.display_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| InsightsError::UnknownPage(wanted.to_string()))
    }
}

// ============================================================================
// Chart line-up
// ============================================================================

pub const BOX_CHARTS: [BoxChartSpec; 3] = [
    BoxChartSpec {
        metric: Metric::DeliveryDelay,
        title: "Delivery Delay by Review Category",
        y_title: "Delay (days)",
        color: "#1f77b4",
        tick_prefix: None,
    },
    BoxChartSpec {
        metric: Metric::ProcessingTime,
        title: "Processing Time by Review Category",
        y_title: "Processing Time (days)",
        color: "#ff7f0e",
        tick_prefix: None,
    },
    BoxChartSpec {
        metric: Metric::FreightValue,
        title: "Freight Value by Review Category",
        y_title: "Freight (BRL)",
        color: "#2ca02c",
        tick_prefix: Some("R$ "),
    },
];

pub const TOP_GROUP_CHARTS: [TopGroupsChartSpec; 3] = [
    TopGroupsChartSpec {
        key: GroupKey::Seller,
        title: "Top Sellers by Delay / Processing / Freight",
        x_title: "Seller ID",
    },
    TopGroupsChartSpec {
        key: GroupKey::City,
        title: "Top Cities by Delay / Processing / Freight",
        x_title: "City",
    },
    TopGroupsChartSpec {
        key: GroupKey::Product,
        title: "Top Products by Delay / Processing / Freight",
        x_title: "Product ID",
    },
];

// ============================================================================
// Page views
// ============================================================================

/// One piece of page content, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Markdown { text: String },
    Warning { text: String },
    Chart { chart: Chart },
    /// A chart that could not be built. Stands in for that chart only.
    Error { title: String, code: String, message: String },
}

/// A fully computed page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageView {
    pub page: Page,
    pub title: String,
    pub blocks: Vec<Block>,
}

impl PageView {
    pub fn charts(&self) -> impl Iterator<Item = &Chart> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Chart { chart } => Some(chart),
            _ => None,
        })
    }

    pub fn has_warning(&self) -> bool {
        self.blocks.iter().any(|b| matches!(b, Block::Warning { .. }))
    }
}

/// Compute `page` for the given dataset.
pub fn render_page(page: Page, state: &DatasetState, config: &DashboardConfig) -> PageView {
    let mut blocks = Vec::new();

    match (page.requires_dataset(), state.dataset()) {
        (false, _) => blocks.push(markdown(content::WELCOME_BODY)),
        (true, None) => {
            debug!("Page '{}' requested without a dataset", page.slug());
            blocks.push(Block::Warning {
                text: content::NO_DATA_WARNING.to_string(),
            });
        }
        (true, Some(dataset)) => {
            let df = &dataset.df;
            match page {
                Page::UnderstandingTheProblem => {
                    blocks.push(markdown(content::UNDERSTANDING_INTRO));
                    for spec in &BOX_CHARTS {
                        blocks.push(chart_block(spec.title, || {
                            build_box_chart(df, spec, config).map(Chart::Box)
                        }));
                    }
                }
                Page::FactorsAndCauses => {
                    blocks.push(markdown(content::FACTORS_INTRO));
                    for spec in &TOP_GROUP_CHARTS {
                        blocks.push(chart_block(spec.title, || {
                            build_top_groups_chart(df, spec, config).map(Chart::Bar)
                        }));
                    }
                }
                Page::ConclusionAndInsights => blocks.push(markdown(content::CONCLUSION_BODY)),
                Page::Welcome => blocks.push(markdown(content::WELCOME_BODY)),
            }
        }
    }

    PageView {
        page,
        title: page.title().to_string(),
        blocks,
    }
}

fn markdown(text: &str) -> Block {
    Block::Markdown { text: text.to_string() }
}

/// Build one chart, turning a failure into an inline error block.
fn chart_block(title: &str, build: impl FnOnce() -> Result<Chart>) -> Block {
    match build() {
        Ok(chart) => Block::Chart { chart },
        Err(e) => {
            warn!("Chart '{}' failed: {}", title, e);
            Block::Error {
                title: title.to_string(),
                code: e.error_code().to_string(),
                message: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_csv_bytes;
    use pretty_assertions::assert_eq;

    const CSV: &str = "\
order_purchase_timestamp,order_approved_at,order_delivered_customer_date,order_estimated_delivery_date,review_score,freight_value,seller_id,customer_city,product_id
2018-01-01 10:00:00,2018-01-01 12:00:00,2018-01-08,2018-01-10,5,10.5,s1,sao paulo,p1
2018-01-02 09:00:00,2018-01-04 09:00:00,2018-01-15,2018-01-10,3,20.0,s2,rio de janeiro,p2
2018-01-03 08:00:00,2018-01-03 08:30:00,2018-01-20,2018-01-10,1,30.0,s3,curitiba,p3
";

    fn loaded() -> DatasetState {
        load_csv_bytes("orders.csv", CSV.as_bytes(), &DashboardConfig::default())
            .unwrap()
            .into()
    }

    #[test]
    fn test_page_parses_slug_and_display_name() {
        assert_eq!("factors-and-causes".parse::<Page>().unwrap(), Page::FactorsAndCauses);
        assert_eq!("Understanding the Problem".parse::<Page>().unwrap(), Page::UnderstandingTheProblem);
        assert_eq!(" WELCOME ".parse::<Page>().unwrap(), Page::Welcome);
        assert_eq!("nope".parse::<Page>().unwrap_err().error_code(), "UNKNOWN_PAGE");
        for page in Page::ALL {
            assert_eq!(page.slug().parse::<Page>().unwrap(), page);
        }
    }

    #[test]
    fn test_welcome_renders_without_data() {
        let view = render_page(Page::Welcome, &DatasetState::Absent, &DashboardConfig::default());
        assert_eq!(view.title, content::WELCOME_TITLE);
        assert!(!view.has_warning());
        assert!(matches!(&view.blocks[0], Block::Markdown { .. }));
    }

    #[test]
    fn test_welcome_links_sample_data() {
        let view = render_page(Page::Welcome, &DatasetState::Absent, &DashboardConfig::default());
        let Block::Markdown { text } = &view.blocks[0] else {
            panic!("expected markdown, got {:?}", view.blocks[0]);
        };
        assert!(text.contains("Data to Upload for Analysis → [link](https://drive.google.com/file/d/"));
    }

    #[test]
    fn test_gated_pages_show_only_the_warning() {
        for page in [Page::UnderstandingTheProblem, Page::FactorsAndCauses, Page::ConclusionAndInsights] {
            let view = render_page(page, &DatasetState::Absent, &DashboardConfig::default());
            assert_eq!(
                view.blocks,
                vec![Block::Warning {
                    text: content::NO_DATA_WARNING.to_string()
                }]
            );
            assert_eq!(view.charts().count(), 0);
        }
    }

    #[test]
    fn test_understanding_page_boxes_by_review_category() {
        let view = render_page(Page::UnderstandingTheProblem, &loaded(), &DashboardConfig::default());
        let charts: Vec<&Chart> = view.charts().collect();
        assert_eq!(charts.len(), 3);

        let Chart::Box(delay) = charts[0] else {
            panic!("expected a box chart");
        };
        assert_eq!(delay.layout.title, "Delivery Delay by Review Category");
        let groups: Vec<(&str, Vec<f64>)> = delay
            .groups
            .iter()
            .map(|g| (g.label.as_str(), g.points.clone()))
            .collect();
        assert_eq!(
            groups,
            vec![("Bad", vec![10.0]), ("Neutral", vec![5.0]), ("Good", vec![-2.0])]
        );

        let Chart::Box(freight) = charts[2] else {
            panic!("expected a box chart");
        };
        assert_eq!(freight.layout.tick_prefix.as_deref(), Some("R$ "));
    }

    #[test]
    fn test_factors_page_ranks_sellers() {
        let view = render_page(Page::FactorsAndCauses, &loaded(), &DashboardConfig::default());
        let charts: Vec<&Chart> = view.charts().collect();
        assert_eq!(charts.len(), 3);

        let Chart::Bar(sellers) = charts[0] else {
            panic!("expected a bar chart");
        };
        assert_eq!(sellers.categories, vec!["s3", "s2", "s1"]);
        assert_eq!(sellers.series[0].labels, vec!["10.0", "5.0", "-2.0"]);
        assert_eq!(charts[1].layout().x_title, "City");
        assert_eq!(charts[2].layout().x_title, "Product ID");
    }

    #[test]
    fn test_top_n_comes_from_config() {
        let config = DashboardConfig::builder().top_n(2).build().unwrap();
        let view = render_page(Page::FactorsAndCauses, &loaded(), &config);
        for chart in view.charts() {
            let Chart::Bar(bar) = chart else {
                panic!("expected a bar chart");
            };
            assert_eq!(bar.categories.len(), 2);
        }
    }

    #[test]
    fn test_conclusion_renders_static_text_with_data() {
        let view = render_page(Page::ConclusionAndInsights, &loaded(), &DashboardConfig::default());
        assert_eq!(view.title, "Conclusion & Insights");
        assert_eq!(view.blocks, vec![markdown(content::CONCLUSION_BODY)]);
    }

    #[test]
    fn test_failing_chart_becomes_error_block() {
        let block = chart_block("Broken", || Err(InsightsError::ColumnNotFound("seller_id".into())));
        assert_eq!(
            block,
            Block::Error {
                title: "Broken".into(),
                code: "COLUMN_NOT_FOUND".into(),
                message: "Column 'seller_id' not found in dataset".into(),
            }
        );
    }

    #[test]
    fn test_page_view_serializes_blocks_with_type_tag() {
        let view = render_page(Page::FactorsAndCauses, &DatasetState::Absent, &DashboardConfig::default());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["page"], "factors-and-causes");
        assert_eq!(json["blocks"][0]["type"], "warning");
    }
}
