use std::net::SocketAddr;

use anyhow::Context;

/// Runtime settings, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// `DATABASE_URL`, default `sqlite://todos.db`.
    pub database_url: String,
    /// `DATABASE_MAX_CONNECTIONS`, default 5.
    pub max_connections: u32,
    /// `TODO_ADDR`, default `127.0.0.1:3000`.
    pub addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://todos.db".to_string(),
            max_connections: 5,
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let database_url = lookup("DATABASE_URL").unwrap_or(defaults.database_url);
        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse().with_context(|| format!("invalid DATABASE_MAX_CONNECTIONS: {raw}"))?,
            None => defaults.max_connections,
        };
        let addr = match lookup("TODO_ADDR") {
            Some(raw) => raw.parse().with_context(|| format!("invalid TODO_ADDR: {raw}"))?,
            None => defaults.addr,
        };
        Ok(Self { database_url, max_connections, addr })
    }
}
