//! Configuration for page rendering and uploads.
//!
//! Built with [`DashboardConfig::builder()`]; every setting has a default
//! that reproduces the stock dashboard.

use serde::{Deserialize, Serialize};

/// Default number of groups kept by the "top N" bar charts.
pub const DEFAULT_TOP_N: usize = 10;

/// Default upload size limit (200 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// Default whisker reach for box plots, in multiples of the IQR.
pub const DEFAULT_WHISKER_IQR_FACTOR: f64 = 1.5;

/// Settings shared by the loader, the page router and the chart renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Number of groups kept per grouped-bar chart after sorting.
    /// Default: 10
    pub top_n: usize,

    /// Largest upload accepted by the loader, in bytes.
    /// Default: 200 MiB
    pub max_upload_bytes: usize,

    /// Box plot whiskers reach this many IQRs past the quartiles.
    /// Default: 1.5
    pub whisker_iqr_factor: f64,

    /// SVG canvas width in pixels.
    /// Default: 900
    pub chart_width: u32,

    /// SVG canvas height in pixels.
    /// Default: 420
    pub chart_height: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            whisker_iqr_factor: DEFAULT_WHISKER_IQR_FACTOR,
            chart_width: 900,
            chart_height: 420,
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```rust
    /// use order_insights::DashboardConfig;
    ///
    /// let config = DashboardConfig::builder().top_n(5).build().unwrap();
    /// assert_eq!(config.top_n, 5);
    /// ```
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.top_n == 0 {
            return Err(ConfigValidationError::InvalidTopN(self.top_n));
        }

        if self.max_upload_bytes == 0 {
            return Err(ConfigValidationError::InvalidUploadLimit);
        }

        if !self.whisker_iqr_factor.is_finite() || self.whisker_iqr_factor < 0.0 {
            return Err(ConfigValidationError::InvalidWhiskerFactor(
                self.whisker_iqr_factor,
            ));
        }

        // Below this the plot area collapses once margins are taken out.
        if self.chart_width < 200 || self.chart_height < 150 {
            return Err(ConfigValidationError::InvalidChartSize {
                width: self.chart_width,
                height: self.chart_height,
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid top_n: {0} (must be at least 1)")]
    InvalidTopN(usize),

    #[error("Invalid upload limit: must be greater than zero")]
    InvalidUploadLimit,

    #[error("Invalid whisker factor: {0} (must be a finite, non-negative number)")]
    InvalidWhiskerFactor(f64),

    #[error("Invalid chart size {width}x{height} (minimum is 200x150)")]
    InvalidChartSize { width: u32, height: u32 },
}

/// Builder for [`DashboardConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    top_n: Option<usize>,
    max_upload_bytes: Option<usize>,
    whisker_iqr_factor: Option<f64>,
    chart_width: Option<u32>,
    chart_height: Option<u32>,
}

impl DashboardConfigBuilder {
    /// Set how many groups the bar charts keep.
    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    /// Set the upload size limit in bytes.
    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = Some(bytes);
        self
    }

    /// Set the whisker reach in IQR multiples.
    pub fn whisker_iqr_factor(mut self, factor: f64) -> Self {
        self.whisker_iqr_factor = Some(factor);
        self
    }

    /// Set the SVG canvas size.
    pub fn chart_size(mut self, width: u32, height: u32) -> Self {
        self.chart_width = Some(width);
        self.chart_height = Some(height);
        self
    }

    /// Build the configuration.
    ///
    /// Returns an error if the resulting configuration is invalid.
    pub fn build(self) -> Result<DashboardConfig, ConfigValidationError> {
        let defaults = DashboardConfig::default();
        let config = DashboardConfig {
            top_n: self.top_n.unwrap_or(defaults.top_n),
            max_upload_bytes: self.max_upload_bytes.unwrap_or(defaults.max_upload_bytes),
            whisker_iqr_factor: self
                .whisker_iqr_factor
                .unwrap_or(defaults.whisker_iqr_factor),
            chart_width: self.chart_width.unwrap_or(defaults.chart_width),
            chart_height: self.chart_height.unwrap_or(defaults.chart_height),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.top_n, 10);
        assert_eq!(config.whisker_iqr_factor, 1.5);
    }

    #[test]
    fn test_builder_overrides() {
        let config = DashboardConfig::builder()
            .top_n(3)
            .max_upload_bytes(1024)
            .chart_size(640, 360)
            .build()
            .unwrap();

        assert_eq!(config.top_n, 3);
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!((config.chart_width, config.chart_height), (640, 360));
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let result = DashboardConfig::builder().top_n(0).build();
        assert!(matches!(result, Err(ConfigValidationError::InvalidTopN(0))));
    }

    #[test]
    fn test_negative_whisker_factor_rejected() {
        let result = DashboardConfig::builder().whisker_iqr_factor(-1.0).build();
        assert!(matches!(
            result,
            Err(ConfigValidationError::InvalidWhiskerFactor(_))
        ));
    }

    #[test]
    fn test_tiny_chart_rejected() {
        let result = DashboardConfig::builder().chart_size(100, 100).build();
        assert!(matches!(
            result,
            Err(ConfigValidationError::InvalidChartSize { .. })
        ));
    }
}
