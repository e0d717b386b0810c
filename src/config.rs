//! Settings read from the process environment.

use crate::error::ConfigError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_SITE_NAME: &str = "CCBC Murrieta";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// `DATABASE_URL`. Absent means no store; store-backed routes fail at call time.
    pub database_url: Option<String>,
    /// `DATABASE_NAME`: schema holding the collections.
    pub database_name: Option<String>,
    pub host: String,
    pub port: u16,
    pub site_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: None,
            database_name: None,
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            site_name: DEFAULT_SITE_NAME.into(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let port = match get("PORT") {
            Some(p) => p.parse().map_err(|_| ConfigError::Invalid { key: "PORT", value: p })?,
            None => DEFAULT_PORT,
        };
        Ok(Settings {
            database_url: get("DATABASE_URL"),
            database_name: get("DATABASE_NAME"),
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            port,
            site_name: get("SITE_NAME").unwrap_or_else(|| DEFAULT_SITE_NAME.into()),
        })
    }

    /// Connection string and database name, when both are set.
    pub fn store_target(&self) -> Option<(&str, &str)> {
        match (&self.database_url, &self.database_name) {
            (Some(url), Some(name)) => Some((url.as_str(), name.as_str())),
            _ => None,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
