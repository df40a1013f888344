use std::time::Duration;

use aws_smithy_types::timeout::TimeoutConfig;
use serde::Deserialize;

/// Client overrides applied on top of the shared `SdkConfig`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppSyncConfig {
    /// AWS region (uses SDK default if not specified)
    pub region: Option<String>,
    /// Optional endpoint override (e.g. LocalStack)
    pub endpoint: Option<String>,
    /// Operation timeout in milliseconds
    pub timeout_ms: Option<u64>,
}

impl AppSyncConfig {
    pub(crate) fn timeout_config(&self) -> Option<TimeoutConfig> {
        self.timeout_ms.map(|timeout_ms| {
            TimeoutConfig::builder()
                .operation_timeout(Duration::from_millis(timeout_ms))
                .build()
        })
    }
}

/// Builds an SDK client from the shared `SdkConfig` plus [`AppSyncConfig`]
/// overrides. Every AWS SDK crate generates the same builder surface.
macro_rules! client_from_config {
    ($sdk:ident, $sdk_config:expr, $config:expr) => {{
        let config: &$crate::config::AppSyncConfig = $config;
        // Inherit HTTP client, retry config, credentials and sleep impl.
        let mut builder = $sdk::config::Builder::from($sdk_config);
        if let Some(region) = &config.region {
            builder = builder.region($sdk::config::Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        if let Some(timeout_config) = config.timeout_config() {
            builder = builder.timeout_config(timeout_config);
        }
        $sdk::Client::from_conf(builder.build())
    }};
}

pub(crate) use client_from_config;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_only_when_set() {
        assert!(AppSyncConfig::default().timeout_config().is_none());

        let config = AppSyncConfig {
            timeout_ms: Some(2_500),
            ..Default::default()
        };
        let timeout = config.timeout_config().unwrap();
        assert_eq!(
            timeout.operation_timeout(),
            Some(Duration::from_millis(2_500))
        );
    }
}
