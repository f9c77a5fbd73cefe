//! Group-wise views of the order table.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{InsightsError, Result, ResultExt};
use crate::schema::derived;
use crate::types::{GroupKey, Metric, ReviewCategory};

/// Per-group means of the three metrics. `None` when every row in the group
/// had a null for that metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMeans {
    pub key: String,
    pub delivery_delay: Option<f64>,
    pub processing_time: Option<f64>,
    pub freight_value: Option<f64>,
}

impl GroupMeans {
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::DeliveryDelay => self.delivery_delay,
            Metric::ProcessingTime => self.processing_time,
            Metric::FreightValue => self.freight_value,
        }
    }
}

/// Mean metrics per `key`, worst average delivery delay first, at most
/// `limit` groups.
///
/// Nulls are skipped by the means. Groups whose mean delay is null sort
/// last; equal delays fall back to ascending key order. Rows with a null key
/// are ignored.
pub fn top_groups_by_delay(df: &DataFrame, key: GroupKey, limit: usize) -> Result<Vec<GroupMeans>> {
    let key_col = key.column();
    require_columns(df, &[key_col, Metric::DeliveryDelay.column(), Metric::ProcessingTime.column(), Metric::FreightValue.column()])?;

    let means: Vec<Expr> = Metric::ALL
        .iter()
        .map(|m| col(m.column()).cast(DataType::Float64).mean())
        .collect();

    let limit = IdxSize::try_from(limit).unwrap_or(IdxSize::MAX);
    let ranked = df
        .clone()
        .lazy()
        .filter(col(key_col).is_not_null())
        .group_by([col(key_col)])
        .agg(means)
        .sort_by_exprs(
            [col(derived::DELIVERY_DELAY), col(key_col)],
            SortMultipleOptions::default()
                .with_order_descending_multi([true, false])
                .with_nulls_last(true)
                .with_maintain_order(true),
        )
        .limit(limit)
        .collect()
        .context(format!("Aggregating by '{key_col}'"))?;

    let keys = ranked.column(key_col)?.cast(&DataType::String)?;
    let delays = ranked.column(Metric::DeliveryDelay.column())?;
    let processing = ranked.column(Metric::ProcessingTime.column())?;
    let freight = ranked.column(Metric::FreightValue.column())?;

    let rows = keys
        .str()?
        .into_iter()
        .zip(delays.f64()?)
        .zip(processing.f64()?)
        .zip(freight.f64()?)
        .filter_map(|(((key, delay), proc), freight)| {
            key.map(|k| GroupMeans {
                key: k.to_string(),
                delivery_delay: delay,
                processing_time: proc,
                freight_value: freight,
            })
        })
        .collect();

    Ok(rows)
}

/// Values of `metric` split by review category, in Bad / Neutral / Good
/// order. Categories without any value are left out; rows with a null
/// metric or category are skipped.
pub fn metric_by_review_category(df: &DataFrame, metric: Metric) -> Result<Vec<(ReviewCategory, Vec<f64>)>> {
    require_columns(df, &[derived::REVIEW_CATEGORY, metric.column()])?;

    let categories = df.column(derived::REVIEW_CATEGORY)?.cast(&DataType::String)?;
    let values = df
        .column(metric.column())?
        .cast(&DataType::Float64)
        .context(format!("Reading '{}' as numbers", metric.column()))?;

    let mut buckets: [Vec<f64>; 3] = Default::default();
    for (category, value) in categories.str()?.into_iter().zip(values.f64()?) {
        let (Some(category), Some(value)) = (category.and_then(ReviewCategory::parse), value) else {
            continue;
        };
        if let Some(slot) = ReviewCategory::ORDER.iter().position(|c| *c == category) {
            buckets[slot].push(value);
        }
    }

    Ok(ReviewCategory::ORDER
        .into_iter()
        .zip(buckets)
        .filter(|(_, values)| !values.is_empty())
        .collect())
}

fn require_columns(df: &DataFrame, names: &[&str]) -> Result<()> {
    match names.iter().find(|name| df.column(name).is_err()) {
        Some(missing) => Err(InsightsError::ColumnNotFound(missing.to_string())),
        None => Ok(()),
    }
}
