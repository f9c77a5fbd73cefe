//! Order Review Insights Library
//!
//! Loads a CSV of e-commerce orders, derives delivery metrics and renders
//! the four pages of the customer-satisfaction dashboard.
//!
//! # Overview
//!
//! - **Loading**: [`load_csv_bytes`] validates and types an uploaded CSV,
//!   reporting problems as [`ParseError`]
//! - **Features**: [`derive_features`] adds `delivery_delay`,
//!   `processing_time`, `delay_category` and `review_category`
//! - **Aggregation**: box-plot statistics per review category and "worst N"
//!   group means per seller, city and product
//! - **Pages**: [`render_page`] turns a [`Page`] and a [`DatasetState`] into a
//!   [`PageView`] of markdown, warning and chart blocks
//! - **Rendering**: [`render_document`] produces a self-contained HTML page
//!   with charts drawn as inline SVG
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use order_insights::{DashboardConfig, DatasetState, Page, load_csv_path, render_page};
//! use std::path::Path;
//!
//! let config = DashboardConfig::builder().top_n(5).build()?;
//! let dataset = load_csv_path(Path::new("orders.csv"), &config)?;
//! let state = DatasetState::from(dataset);
//!
//! let view = render_page(Page::FactorsAndCauses, &state, &config);
//! for chart in view.charts() {
//!     println!("{}", chart.layout().title);
//! }
//! ```

pub mod aggregation;
pub mod charts;
pub mod config;
pub mod error;
pub mod features;
pub mod loader;
pub mod pages;
pub mod render;
pub mod schema;
pub mod types;

// Re-exports for convenient access
pub use aggregation::{BoxStats, GroupMeans, metric_by_review_category, top_groups_by_delay};
pub use charts::{BarChart, BoxChart, Chart, svg::render_chart};
pub use config::{ConfigValidationError, DashboardConfig, DashboardConfigBuilder};
pub use error::{InsightsError, ParseError, Result, ResultExt};
pub use features::{delay_category, derive_features, review_category};
pub use loader::{DatasetState, LoadedDataset, load_csv_bytes, load_csv_path};
pub use pages::{Block, Page, PageView, render_page};
pub use render::{DocumentContext, render_document};
pub use types::{ColumnInfo, DatasetInfo, DelayCategory, GroupKey, Metric, ReviewCategory};
