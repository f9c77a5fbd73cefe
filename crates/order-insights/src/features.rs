//! Feature deriver.
//!
//! Adds `delivery_delay`, `processing_time`, `delay_category` and
//! `review_category` to a typed order table. The derived columns depend only
//! on the raw columns, so deriving an already-derived table replaces them with
//! identical values.

use polars::prelude::*;

use crate::error::{InsightsError, Result, ResultExt};
use crate::schema::{derived, order};
use crate::types::{DelayCategory, ReviewCategory};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Bucket a delivery delay in whole days. Ties go to the milder bucket.
pub fn delay_category(delay_days: i64) -> DelayCategory {
    if delay_days <= 0 {
        DelayCategory::OnTime
    } else if delay_days <= 7 {
        DelayCategory::SlightlyLate
    } else {
        DelayCategory::VeryLate
    }
}

/// Bucket a review score.
pub fn review_category(score: i64) -> ReviewCategory {
    if score <= 2 {
        ReviewCategory::Bad
    } else if score == 3 {
        ReviewCategory::Neutral
    } else {
        ReviewCategory::Good
    }
}

/// Whole days between two millisecond timestamps, floored so a partial day
/// early counts as a full day early. `None` when either side is missing.
pub fn whole_days_between(later_ms: Option<i64>, earlier_ms: Option<i64>) -> Option<i64> {
    match (later_ms, earlier_ms) {
        (Some(later), Some(earlier)) => Some((later - earlier).div_euclid(MILLIS_PER_DAY)),
        _ => None,
    }
}

/// Return a copy of `df` with the four derived columns set.
pub fn derive_features(df: &DataFrame) -> Result<DataFrame> {
    let delivered = timestamp_millis(df, order::DELIVERED_AT)?;
    let estimated = timestamp_millis(df, order::ESTIMATED_DELIVERY_AT)?;
    let approved = timestamp_millis(df, order::APPROVED_AT)?;
    let purchased = timestamp_millis(df, order::PURCHASED_AT)?;

    let delivery_delay: Vec<Option<i64>> = delivered
        .iter()
        .zip(&estimated)
        .map(|(d, e)| whole_days_between(*d, *e))
        .collect();

    let processing_time: Vec<Option<i64>> = approved
        .iter()
        .zip(&purchased)
        .map(|(a, p)| whole_days_between(*a, *p))
        .collect();

    let delay_categories: Vec<Option<&str>> = delivery_delay
        .iter()
        .map(|d| d.map(|days| delay_category(days).as_str()))
        .collect();

    let scores = df
        .column(order::REVIEW_SCORE)
        .map_err(|_| InsightsError::ColumnNotFound(order::REVIEW_SCORE.to_string()))?
        .cast(&DataType::Int64)
        .context("Casting review scores")?;
    let review_categories: Vec<Option<&str>> = scores
        .i64()?
        .into_iter()
        .map(|s| s.map(|score| review_category(score).as_str()))
        .collect();

    let mut out = df.clone();
    out.with_column(Series::new(derived::DELIVERY_DELAY.into(), delivery_delay))?;
    out.with_column(Series::new(derived::PROCESSING_TIME.into(), processing_time))?;
    out.with_column(Series::new(derived::DELAY_CATEGORY.into(), delay_categories))?;
    out.with_column(Series::new(derived::REVIEW_CATEGORY.into(), review_categories))?;

    Ok(out)
}

/// Read a datetime column as epoch milliseconds, whatever its stored unit.
fn timestamp_millis(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let column = df
        .column(name)
        .map_err(|_| InsightsError::ColumnNotFound(name.to_string()))?;

    let millis = column
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
        .and_then(|c| c.cast(&DataType::Int64))
        .context(format!("Reading '{name}' as timestamps"))?;

    Ok(millis.i64()?.into_iter().collect())
}
