use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_LLEMMA_API_URL: &str = "https://api.llemma.com/v1/ocr";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Startup configuration. Built once and shared read-only by every request.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub api_url: String,
    pub api_key: SecretString,
    pub bind_addr: SocketAddr,
    pub max_upload_bytes: usize,
    /// Outbound timeout. `None` waits on Llemma indefinitely.
    pub timeout: Option<Duration>,
}

impl RelayConfig {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: SecretString::from(api_key.into()),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            timeout: None,
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads every setting through `lookup`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = var("LLEMMA_API_KEY")
            .ok_or_else(|| anyhow!("LLEMMA_API_KEY environment variable not set"))?;
        let api_url = var("LLEMMA_API_URL").unwrap_or_else(|| DEFAULT_LLEMMA_API_URL.to_string());

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:8000")?;

        let max_upload_bytes = match var("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("MAX_UPLOAD_BYTES must be a byte count, got {raw:?}"))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let timeout = match var("LLEMMA_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().with_context(|| {
                    format!("LLEMMA_TIMEOUT_SECS must be whole seconds, got {raw:?}")
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            api_url,
            api_key: SecretString::from(api_key),
            bind_addr,
            max_upload_bytes,
            timeout,
        })
    }
}
