use anyhow::Context;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://users.db";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup instead of the process env.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            None => 1,
        };
        anyhow::ensure!(max_connections > 0, "DB_MAX_CONNECTIONS must be at least 1");
        Ok(Self {
            database_url,
            max_connections,
        })
    }

    pub fn with_database_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.database_url = url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_env_is_empty() {
        let cfg = AppConfig::from_lookup(lookup_from(&[])).expect("config");
        assert_eq!(cfg.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(cfg.max_connections, 1);
    }

    #[test]
    fn reads_database_url_and_pool_size() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://other.db"),
            ("DB_MAX_CONNECTIONS", "4"),
        ]))
        .expect("config");
        assert_eq!(cfg.database_url, "sqlite://other.db");
        assert_eq!(cfg.max_connections, 4);
    }

    #[test]
    fn rejects_bad_pool_size() {
        assert!(AppConfig::from_lookup(lookup_from(&[("DB_MAX_CONNECTIONS", "lots")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("DB_MAX_CONNECTIONS", "0")])).is_err());
    }

    #[test]
    fn cli_override_wins() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "sqlite://env.db")]))
            .expect("config")
            .with_database_url(Some("sqlite://flag.db".into()));
        assert_eq!(cfg.database_url, "sqlite://flag.db");

        let cfg = cfg.with_database_url(None);
        assert_eq!(cfg.database_url, "sqlite://flag.db");
    }
}
