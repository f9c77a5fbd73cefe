//! Server settings.

use order_insights::DashboardConfig;
use std::net::SocketAddr;
use std::time::Duration;

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Sessions idle for longer than this are dropped.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Multipart framing around the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub session_ttl: Duration,
    /// How often the idle-session sweep runs.
    pub sweep_interval: Duration,
    pub dashboard: DashboardConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8501)),
            session_ttl: DEFAULT_SESSION_TTL,
            sweep_interval: Duration::from_secs(60),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ServerConfigError> {
        if self.session_ttl.is_zero() {
            return Err(ServerConfigError::InvalidSessionTtl);
        }
        if self.sweep_interval.is_zero() {
            return Err(ServerConfigError::InvalidSweepInterval);
        }
        self.dashboard
            .validate()
            .map_err(|e| ServerConfigError::Dashboard(e.to_string()))
    }

    /// Request body limit for the upload route. The loader enforces the
    /// exact file limit itself.
    pub fn body_limit(&self) -> usize {
        self.dashboard
            .max_upload_bytes
            .saturating_add(MULTIPART_OVERHEAD_BYTES)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerConfigError {
    #[error("Invalid session TTL: must be greater than zero")]
    InvalidSessionTtl,

    #[error("Invalid sweep interval: must be greater than zero")]
    InvalidSweepInterval,

    #[error("Invalid dashboard settings: {0}")]
    Dashboard(String),
}

#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    bind: Option<SocketAddr>,
    session_ttl: Option<Duration>,
    sweep_interval: Option<Duration>,
    dashboard: Option<DashboardConfig>,
}

impl ServerConfigBuilder {
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind = Some(addr);
        self
    }

    pub fn session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = Some(ttl);
        self
    }

    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = Some(interval);
        self
    }

    pub fn dashboard(mut self, dashboard: DashboardConfig) -> Self {
        self.dashboard = Some(dashboard);
        self
    }

    pub fn build(self) -> Result<ServerConfig, ServerConfigError> {
        let default = ServerConfig::default();
        let session_ttl = self.session_ttl.unwrap_or(default.session_ttl);
        let config = ServerConfig {
            bind: self.bind.unwrap_or(default.bind),
            session_ttl,
            // Sweep at least as often as sessions can expire.
            sweep_interval: self
                .sweep_interval
                .unwrap_or_else(|| default.sweep_interval.min(session_ttl)),
            dashboard: self.dashboard.unwrap_or(default.dashboard),
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
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let result = ServerConfig::builder().session_ttl(Duration::ZERO).build();
        assert!(matches!(result, Err(ServerConfigError::InvalidSessionTtl)));
    }

    #[test]
    fn test_short_ttl_shortens_sweep() {
        let config = ServerConfig::builder()
            .session_ttl(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(config.sweep_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_body_limit_leaves_room_for_framing() {
        let dashboard = DashboardConfig::builder().max_upload_bytes(1000).build().unwrap();
        let config = ServerConfig::builder().dashboard(dashboard).build().unwrap();
        assert!(config.body_limit() > 1000);
    }
}
