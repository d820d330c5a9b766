use std::net::SocketAddr;

use anyhow::{Context, Result};
use natter_db::DbConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db: DbConfig,
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Reads `NATTER_DB_PATH`, `NATTER_HOST` and `NATTER_PORT`, falling back
    /// to defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = lookup("NATTER_DB_PATH").unwrap_or_else(|| "natter.db".into());
        let host = lookup("NATTER_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("NATTER_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("NATTER_PORT is not a valid port: {raw:?}"))?,
            None => 3000,
        };

        Ok(Self {
            db: DbConfig::new(db_path),
            host,
            port,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
