use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use dotenv::dotenv;
use std::{env, fmt, str::FromStr};

use crate::constants::DEFAULT_STORE_TIMEOUT_SECS;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    /// Project URL of the hosted store. Unset means fallback mode.
    #[serde(default)]
    pub store_url: Option<String>,

    #[serde(default)]
    pub store_key: Option<String>,

    #[serde(default = "default_store_timeout")]
    pub store_timeout_secs: u64,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-CMS".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_store_timeout() -> u64 {
    DEFAULT_STORE_TIMEOUT_SECS
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            name: default_name(),
            port: default_port(),
            host: default_host(),
            worker_count: default_worker_count(),
            cors_allowed_origins: default_cors_origins(),
            store_url: None,
            store_key: None,
            store_timeout_secs: default_store_timeout(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .try_parsing(true)
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;
        config.store_url = non_blank(config.store_url.take());
        config.store_key = non_blank(config.store_key.take());

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.store_timeout_secs == 0 {
            errors.push("STORE_TIMEOUT_SECS must be greater than zero".to_string());
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production".to_string());
        }
        for origin in self.cors_origins().iter().filter(|o| *o != "*") {
            if !is_origin(origin) {
                errors.push(format!("Invalid CORS origin `{origin}`: expected scheme://host[:port]"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn store_url(&self) -> Option<&str> {
        self.store_url.as_deref()
    }

    pub fn store_key(&self) -> Option<&str> {
        self.store_key.as_deref()
    }

    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            environment: self.env.clone(),
            store_url_set: self.store_url.is_some(),
            store_key_set: self.store_key.is_some(),
        }
    }
}

/// `scheme://host[:port]` over http(s), with no path, query or trailing slash.
fn is_origin(origin: &str) -> bool {
    match url::Url::parse(origin) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.has_host()
                && url.origin().ascii_serialization() == origin
        }
        Err(_) => false,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Secret-free view of the configuration, safe to return from the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub environment: AppEnvironment,
    pub store_url_set: bool,
    pub store_key_set: bool,
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for Option<String> {
    fn redact(&self) -> &str {
        match self {
            None => "[MISSING]",
            Some(_) => "[REDACTED]",
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("store_url", &self.store_url)
            .field("store_key", &self.store_key.redact())
            .field("store_timeout_secs", &self.store_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_store_key() {
        let config = AppConfig {
            store_url: Some("https://abc.supabase.co".into()),
            store_key: Some("super-secret-anon-key".into()),
            ..Default::default()
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret-anon-key"));
        assert!(printed.contains("[REDACTED]"));
    }

    #[test]
    fn blank_store_values_count_as_missing() {
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(Some("x".into())), Some("x".into()));
    }

    #[test]
    fn production_rejects_wildcard_cors() {
        let config = AppConfig { env: AppEnvironment::Production, ..Default::default() };
        assert!(config.validate().is_err());

        let config = AppConfig {
            env: AppEnvironment::Production,
            cors_allowed_origins: vec!["https://example.com".into()],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn malformed_cors_origins_are_rejected() {
        for origin in ["localhost:3000", "https://example.com/", "https://example.com/admin", "ftp://example.com"] {
            let config = AppConfig { cors_allowed_origins: vec![origin.into()], ..Default::default() };
            assert!(config.validate().is_err(), "{origin} should be rejected");
        }

        let config = AppConfig {
            cors_allowed_origins: vec!["http://localhost:3000, https://example.com".into()],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn summary_reports_presence_only() {
        let config = AppConfig { store_url: Some("memory://local".into()), ..Default::default() };
        let summary = config.summary();
        assert!(summary.store_url_set);
        assert!(!summary.store_key_set);
    }
}
