//! Runtime configuration.
//!
//! Settings are read from a JSON document (camelCase keys) whose path comes
//! from the first CLI argument, then the `RULEBRIDGE_CONFIG` environment
//! variable, then `rulebridge.json` in the working directory. A missing file
//! is not an error: defaults apply and environment variables may still
//! override individual fields.

use rulebridge_domain::rule::Rule;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to parse configuration file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the remote rule registry.
    pub system_url: String,
    pub username: String,
    pub password: String,
    /// Address the local callback server advertises and binds to.
    pub my_ip: String,
    pub my_port: u16,
    /// Rules already known locally, used to seed the in-memory cache.
    pub rules: Vec<Rule>,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            system_url: "http://127.0.0.1:7001".into(),
            username: "admin".into(),
            password: "admin".into(),
            my_ip: "127.0.0.1".into(),
            my_port: 8080,
            rules: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Tracing filter directive, overridable with `RULEBRIDGE_LOG` or `RUST_LOG`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,rulebridged=debug,tower_http=debug".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::args()
            .nth(1)
            .or_else(|| std::env::var("RULEBRIDGE_CONFIG").ok())
            .unwrap_or_else(|| "rulebridge.json".to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn apply_env(&mut self) {
        if let Ok(value) = std::env::var("RULEBRIDGE_SYSTEM_URL") {
            self.system_url = value;
        }
        if let Ok(value) = std::env::var("RULEBRIDGE_USERNAME") {
            self.username = value;
        }
        if let Ok(value) = std::env::var("RULEBRIDGE_PASSWORD") {
            self.password = value;
        }
        if let Ok(value) = std::env::var("RULEBRIDGE_MY_IP") {
            self.my_ip = value;
        }
        if let Ok(value) = std::env::var("RULEBRIDGE_MY_PORT")
            && let Ok(port) = value.parse()
        {
            self.my_port = port;
        }
        if let Ok(value) = std::env::var("RULEBRIDGE_LOG").or_else(|_| std::env::var("RUST_LOG")) {
            self.logging.filter = value;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.my_port == 0 {
            return Err(ConfigError::Validation("myPort must be non-zero".into()));
        }
        if !self.system_url.starts_with("http://") && !self.system_url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "systemUrl must be an absolute http(s) URL".into(),
            ));
        }
        Ok(())
    }

    /// URL of the local welcome route as seen from the registry side.
    pub fn welcome_url(&self) -> String {
        format!("http://{}:{}/welcome/", self.my_ip, self.my_port)
    }
}
