use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::net::lookup_host;

use crate::errors::{InsightsError, Result};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATA_DIR: &str = "data";

/// Runtime settings, read from `INSIGHTS_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Overrides the date-derived seed of the mock generators.
    pub mock_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            mock_seed: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("INSIGHTS_PORT") {
            Some(raw) => parse_var("INSIGHTS_PORT", &raw)?,
            None => defaults.port,
        };
        let mock_seed = match get("INSIGHTS_MOCK_SEED") {
            Some(raw) => Some(parse_var("INSIGHTS_MOCK_SEED", &raw)?),
            None => None,
        };

        Ok(Self {
            host: get("INSIGHTS_HOST").unwrap_or(defaults.host),
            port,
            data_dir: get("INSIGHTS_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            mock_seed,
        })
    }

    /// Resolve `host:port`; the host may be a name such as `localhost`.
    pub async fn resolve_addr(&self) -> Result<SocketAddr> {
        let invalid = |reason: String| InsightsError::InvalidConfig {
            key: "INSIGHTS_HOST".into(),
            reason,
        };
        lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| invalid(format!("{:?}: {e}", self.host)))?
            .next()
            .ok_or_else(|| invalid(format!("{:?} resolved to no address", self.host)))
    }

    pub fn gps_csv_path(&self) -> PathBuf {
        self.data_dir.join("gps.csv")
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| InsightsError::InvalidConfig {
            key: key.to_string(),
            reason: format!("{raw:?}: {e}"),
        })
}
