//! Aggregations behind the analysis pages.
//!
//! - [`metric_by_review_category`] + [`BoxStats`] feed the box plots.
//! - [`top_groups_by_delay`] feeds the "top N" grouped bar charts.

mod groups;
mod quartiles;

pub use groups::{GroupMeans, metric_by_review_category, top_groups_by_delay};
pub use quartiles::{BoxStats, quantile_inclusive};
