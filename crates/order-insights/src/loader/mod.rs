//! Input loader.
//!
//! Turns uploaded bytes into a typed order table with derived features, or
//! reports why it could not. The absence of an upload is modelled separately
//! as [`DatasetState::Absent`] so pages can tell "nothing uploaded yet" from
//! "uploaded a file with zero rows".
//!
//! # Pipeline
//!
//! ```text
//! bytes ──► size / emptiness checks ──► CSV reader (all columns as text)
//!       ──► required-column check ──► typed columns ──► derive_features
//!       ──► LoadedDataset { df, info }
//! ```
//!
//! The reader is asked for text columns only, and typing happens per column
//! in [`parsers`]. That keeps error messages precise: a bad cell is reported
//! with its column, row and raw value instead of a reader-level type error.

pub mod parsers;

use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::DashboardConfig;
use crate::error::{ParseError, Result};
use crate::features::derive_features;
use crate::schema::order;
use crate::types::{ColumnInfo, DatasetInfo};

// ============================================================================
// DATASET CONTAINERS
// ============================================================================

/// A loaded, feature-augmented order table plus its metadata.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    /// Raw columns (typed) followed by the derived columns.
    pub df: DataFrame,

    /// Metadata computed once at load time.
    pub info: DatasetInfo,
}

/// What a session currently holds.
#[derive(Debug, Clone, Default)]
pub enum DatasetState {
    /// No file has been supplied.
    #[default]
    Absent,
    /// A file was parsed successfully.
    Loaded(Arc<LoadedDataset>),
}

impl DatasetState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// The dataset, if one is loaded.
    pub fn dataset(&self) -> Option<&LoadedDataset> {
        match self {
            Self::Absent => None,
            Self::Loaded(dataset) => Some(dataset),
        }
    }
}

impl From<LoadedDataset> for DatasetState {
    fn from(dataset: LoadedDataset) -> Self {
        Self::Loaded(Arc::new(dataset))
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Parse an uploaded CSV into a [`LoadedDataset`].
///
/// `name` is only used for display. Fails with [`ParseError`] (wrapped in
/// [`crate::InsightsError::Parse`]) on empty, oversized or malformed input.
pub fn load_csv_bytes(name: &str, bytes: &[u8], config: &DashboardConfig) -> Result<LoadedDataset> {
    if bytes.len() > config.max_upload_bytes {
        return Err(ParseError::TooLarge {
            size: bytes.len(),
            limit: config.max_upload_bytes,
        }
        .into());
    }

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ParseError::Empty.into());
    }

    debug!("Reading {} ({} bytes)", name, bytes.len());
    let raw = read_text_table(bytes)?;
    check_required_columns(&raw)?;

    let typed = apply_column_types(raw)?;
    log_suspicious_values(&typed);

    let df = derive_features(&typed)?;
    let info = dataset_info(name, bytes.len(), &df);
    info!(
        "Loaded dataset '{}': {} rows x {} columns",
        info.name, info.row_count, info.column_count
    );

    Ok(LoadedDataset { df, info })
}

/// Read a CSV file from disk. Used by the offline CLI.
pub fn load_csv_path(path: &Path, config: &DashboardConfig) -> Result<LoadedDataset> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    load_csv_bytes(&name, &bytes, config)
}

/// Run the CSV reader with every column kept as text.
fn read_text_table(bytes: &[u8]) -> std::result::Result<DataFrame, ParseError> {
    CsvReadOptions::default()
        .with_has_header(true)
        // A zero-length inference window makes every column a String column.
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
        .map_err(|e| ParseError::Malformed(e.to_string()))
}

fn check_required_columns(df: &DataFrame) -> std::result::Result<(), ParseError> {
    let missing: Vec<String> = order::REQUIRED
        .iter()
        .filter(|name| df.column(name).is_err())
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ParseError::MissingColumns(missing))
    }
}

/// Replace the text columns that carry typed data. Identifier and extra
/// columns stay as strings.
fn apply_column_types(mut df: DataFrame) -> std::result::Result<DataFrame, ParseError> {
    let mut typed: Vec<Series> = Vec::with_capacity(order::TIMESTAMPS.len() + 2);

    for name in order::TIMESTAMPS {
        typed.push(parsers::timestamp_column(text_column(&df, name)?)?);
    }
    typed.push(parsers::integer_column(text_column(
        &df,
        order::REVIEW_SCORE,
    )?)?);
    typed.push(parsers::float_column(text_column(
        &df,
        order::FREIGHT_VALUE,
    )?)?);

    for series in typed {
        df.with_column(series)
            .map_err(|e| ParseError::Malformed(e.to_string()))?;
    }

    Ok(df)
}

fn text_column<'a>(df: &'a DataFrame, name: &str) -> std::result::Result<&'a Column, ParseError> {
    df.column(name)
        .map_err(|_| ParseError::MissingColumns(vec![name.to_string()]))
}

/// Out-of-range scores and negative freight are kept, but worth a log line.
fn log_suspicious_values(df: &DataFrame) {
    if let Ok(scores) = df.column(order::REVIEW_SCORE).and_then(|c| c.i64().cloned()) {
        let out_of_range = scores
            .into_iter()
            .flatten()
            .filter(|s| !(1..=5).contains(s))
            .count();
        if out_of_range > 0 {
            warn!("{} review score(s) outside 1-5", out_of_range);
        }
    }

    if let Ok(freight) = df.column(order::FREIGHT_VALUE).and_then(|c| c.f64().cloned()) {
        let negative = freight.into_iter().flatten().filter(|v| *v < 0.0).count();
        if negative > 0 {
            warn!("{} negative freight value(s)", negative);
        }
    }
}

/// Build the sidebar metadata for a loaded table.
pub fn dataset_info(name: &str, size_bytes: usize, df: &DataFrame) -> DatasetInfo {
    let columns = df
        .get_columns()
        .iter()
        .map(|col| ColumnInfo {
            name: col.name().to_string(),
            dtype: col.dtype().to_string(),
            null_count: col.null_count(),
        })
        .collect();

    DatasetInfo {
        name: name.to_string(),
        size_bytes,
        row_count: df.height(),
        column_count: df.width(),
        columns,
    }
}
