// Runtime configuration, read from environment variables
//
//   FLEET_DB    SQLite file (default: fleet.db)
//   FLEET_HOST  bind host  (default: 0.0.0.0)
//   PORT        bind port  (default: 3000)
//   RUST_LOG    log filter (default: DEFAULT_LOG_FILTER)

use anyhow::{Context, Result};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "fleet.db";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LOG_FILTER: &str = "fleet_registry=info,tower_http=debug,warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub addr: SocketAddr,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("FLEET_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let host_str = lookup("FLEET_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host: IpAddr = host_str
            .parse()
            .with_context(|| format!("FLEET_HOST is not an IP address: {}", host_str))?;

        let port = match lookup("PORT") {
            Some(p) => p
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port number: {}", p))?,
            None => DEFAULT_PORT,
        };

        let log_filter = lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Config {
            db_path,
            addr: SocketAddr::new(host, port),
            log_filter,
        })
    }
}

/// Install the global tracing subscriber using `filter`
pub fn init_tracing(filter: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // a second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
