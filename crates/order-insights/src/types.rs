use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::{derived, order};

// ============================================================================
// Categories
// ============================================================================

/// Coarse bucketing of the 1-5 review score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReviewCategory {
    Bad,
    Neutral,
    Good,
}

impl ReviewCategory {
    /// Display order used on chart axes.
    pub const ORDER: [ReviewCategory; 3] = [Self::Bad, Self::Neutral, Self::Good];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bad => "Bad",
            Self::Neutral => "Neutral",
            Self::Good => "Good",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ORDER.into_iter().find(|c| c.as_str() == label)
    }
}

impl fmt::Display for ReviewCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse bucketing of the delivery delay in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DelayCategory {
    OnTime,
    SlightlyLate,
    VeryLate,
}

impl DelayCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTime => "On-time",
            Self::SlightlyLate => "Slightly Late",
            Self::VeryLate => "Very Late",
        }
    }
}

impl fmt::Display for DelayCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Metrics and grouping keys
// ============================================================================

/// A numeric per-order measure plotted on the analysis pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    DeliveryDelay,
    ProcessingTime,
    FreightValue,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Self::DeliveryDelay, Self::ProcessingTime, Self::FreightValue];

    /// Column holding the metric.
    pub fn column(&self) -> &'static str {
        match self {
            Self::DeliveryDelay => derived::DELIVERY_DELAY,
            Self::ProcessingTime => derived::PROCESSING_TIME,
            Self::FreightValue => order::FREIGHT_VALUE,
        }
    }
}

/// Column the "top N" bar charts group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Seller,
    City,
    Product,
}

impl GroupKey {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Seller => order::SELLER_ID,
            Self::City => order::CUSTOMER_CITY,
            Self::Product => order::PRODUCT_ID,
        }
    }
}

// ============================================================================
// Dataset metadata
// ============================================================================

/// Information about a single column of a loaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub null_count: usize,
}

/// Metadata about an uploaded file, shown in the sidebar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    /// File name as supplied by the upload control.
    pub name: String,
    pub size_bytes: usize,
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_category_order_and_labels() {
        let labels: Vec<&str> = ReviewCategory::ORDER.iter().map(|c| c.as_str()).collect();
        assert_eq!(labels, vec!["Bad", "Neutral", "Good"]);
        assert_eq!(ReviewCategory::parse("Neutral"), Some(ReviewCategory::Neutral));
        assert_eq!(ReviewCategory::parse("neutral"), None);
    }

    #[test]
    fn test_delay_category_labels() {
        assert_eq!(DelayCategory::OnTime.to_string(), "On-time");
        assert_eq!(DelayCategory::SlightlyLate.to_string(), "Slightly Late");
        assert_eq!(DelayCategory::VeryLate.to_string(), "Very Late");
    }

    #[test]
    fn test_metric_columns() {
        assert_eq!(Metric::DeliveryDelay.column(), "delivery_delay");
        assert_eq!(Metric::FreightValue.column(), "freight_value");
        assert_eq!(
            serde_json::to_string(&Metric::ProcessingTime).unwrap(),
            "\"processing_time\""
        );
    }
}
