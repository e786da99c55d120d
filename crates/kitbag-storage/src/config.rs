//! Storage client configuration

use crate::error::{Result, StorageError};
use kitbag_env::{EnvGuard, EnvSource, Terminator};

pub const DEFAULT_REGION: &str = "us-east-1";

/// Names of the environment variables holding the storage settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvNames {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

impl Default for EnvNames {
    fn default() -> Self {
        Self::with_prefix("STORE_S3")
    }
}

impl EnvNames {
    /// `S3` gives `S3_ENDPOINT`, `S3_ACCESS_KEY`, `S3_SECRET_KEY`, `S3_REGION`.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            endpoint: format!("{}_ENDPOINT", prefix),
            access_key: format!("{}_ACCESS_KEY", prefix),
            secret_key: format!("{}_SECRET_KEY", prefix),
            region: format!("{}_REGION", prefix),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Host (`s3.example.com`, `localhost:9000`) or full URL
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    /// Scheme for endpoints given without one
    pub use_ssl: bool,
    pub path_style: bool,
}

impl StorageConfig {
    pub fn new(
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            region: DEFAULT_REGION.to_string(),
            use_ssl: true,
            path_style: true,
        }
    }

    /// Read endpoint and credentials through the guard. A missing value is
    /// reported by the guard (alert and exit) before the error is returned.
    pub fn from_env<S: EnvSource, T: Terminator>(
        guard: &EnvGuard<S, T>,
        names: &EnvNames,
    ) -> Result<Self> {
        let endpoint = guard.require_env(&names.endpoint)?;
        let access_key = guard.require_env(&names.access_key)?;
        let secret_key = guard.require_env(&names.secret_key)?;

        let mut config = Self::new(endpoint, access_key, secret_key);
        if let Some(region) = guard.var(&names.region).filter(|r| !r.is_empty()) {
            config.region = region;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn use_ssl(mut self, use_ssl: bool) -> Self {
        self.use_ssl = use_ssl;
        self
    }

    pub fn path_style(mut self, path_style: bool) -> Self {
        self.path_style = path_style;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(StorageError::InvalidConfig(
                "endpoint not configured".to_string(),
            ));
        }

        if self.access_key.is_empty() || self.secret_key.is_empty() {
            return Err(StorageError::InvalidConfig(
                "credentials not configured".to_string(),
            ));
        }

        if self.region.is_empty() {
            return Err(StorageError::InvalidConfig("region is empty".to_string()));
        }

        Ok(())
    }

    /// Endpoint as a URL, adding `https://` (or `http://` without SSL) when
    /// no scheme is present.
    pub fn endpoint_url(&self) -> String {
        let endpoint = self.endpoint.trim().trim_end_matches('/');
        if endpoint.contains("://") {
            return endpoint.to_string();
        }

        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{}://{}", scheme, endpoint)
    }
}
