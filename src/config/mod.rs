#[cfg(feature = "cli")]
pub mod cli;

use crate::core::pacing::{PacingPolicy, DEFAULT_MAX_DELAY_MS, DEFAULT_MIN_DELAY_MS};
use crate::core::validator::{is_valid_phone, DEFAULT_MAX_BATCH};
use crate::domain::model::Tenant;
use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub transport: TransportConfig,
    #[serde(default)]
    pub bulk: BulkConfig,
    #[serde(default)]
    pub instances: Vec<Tenant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkConfig {
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,
    #[serde(default = "default_min_delay")]
    pub min_delay_ms: u64,
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_shutdown_grace() -> u64 {
    30
}

fn default_max_messages() -> usize {
    DEFAULT_MAX_BATCH
}

fn default_min_delay() -> u64 {
    DEFAULT_MIN_DELAY_MS
}

fn default_max_delay() -> u64 {
    DEFAULT_MAX_DELAY_MS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_grace_seconds: default_shutdown_grace(),
        }
    }
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            max_messages: default_max_messages(),
            min_delay_ms: default_min_delay(),
            max_delay_ms: default_max_delay(),
        }
    }
}

impl GatewayConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GatewayError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| GatewayError::ConfigParseError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_KEY})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// `PORT` 環境變數覆蓋 server.port
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| GatewayError::InvalidConfigValueError {
                    field: "PORT".to_string(),
                    value: port.clone(),
                    reason: "Must be a port number".to_string(),
                })?;
        }
        Ok(())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("transport.endpoint", &self.transport.endpoint)?;
        validation::validate_non_empty_string("server.host", &self.server.host)?;
        validation::validate_range("server.port", self.server.port, 1, u16::MAX)?;
        validation::validate_positive_number("bulk.max_messages", self.bulk.max_messages, 1)?;

        if self.bulk.min_delay_ms > self.bulk.max_delay_ms {
            return Err(GatewayError::InvalidConfigValueError {
                field: "bulk.min_delay_ms".to_string(),
                value: self.bulk.min_delay_ms.to_string(),
                reason: format!("Must not exceed bulk.max_delay_ms ({})", self.bulk.max_delay_ms),
            });
        }

        if self.instances.is_empty() {
            return Err(GatewayError::MissingConfigError {
                field: "instances".to_string(),
            });
        }

        for (i, instance) in self.instances.iter().enumerate() {
            if !is_valid_phone(&instance.phone_number) {
                return Err(GatewayError::InvalidConfigValueError {
                    field: format!("instances[{}].phone_number", i),
                    value: instance.phone_number.clone(),
                    reason: "Expected '+' followed by 10 to 15 digits".to_string(),
                });
            }
            if instance.api_key.trim().is_empty() || instance.api_key.contains("${") {
                return Err(GatewayError::InvalidConfigValueError {
                    field: format!("instances[{}].api_key", i),
                    value: String::new(),
                    reason: "API key is empty or references an unset environment variable"
                        .to_string(),
                });
            }
        }

        validation::validate_unique(
            "instances.api_key",
            self.instances.iter().map(|t| t.api_key.trim()),
        )?;

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn pacing_policy(&self) -> PacingPolicy {
        PacingPolicy::from_millis(self.bulk.min_delay_ms, self.bulk.max_delay_ms)
    }

    pub fn transport_timeout(&self) -> Duration {
        Duration::from_secs(self.transport.timeout_seconds.unwrap_or(30))
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_grace_seconds)
    }

    /// Tenants with keys trimmed, as the auth gate compares trimmed keys.
    pub fn tenants(&self) -> Vec<Tenant> {
        self.instances
            .iter()
            .map(|t| Tenant {
                phone_number: t.phone_number.clone(),
                api_key: t.api_key.trim().to_string(),
            })
            .collect()
    }
}

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
[transport]
endpoint = "http://localhost:8080"

[[instances]]
phone_number = "+15551234567"
api_key = "secret-key"
"#;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let config = GatewayConfig::from_toml_str(MINIMAL).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.bulk.max_messages, 1000);
        assert_eq!(config.pacing_policy(), PacingPolicy::from_millis(10, 750));
        assert_eq!(config.transport_timeout(), Duration::from_secs(30));
        assert_eq!(config.instances.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 8088
shutdown_grace_seconds = 5

[transport]
endpoint = "https://sessions.internal/api"
timeout_seconds = 10

[bulk]
max_messages = 50
min_delay_ms = 100
max_delay_ms = 200

[[instances]]
phone_number = "+15551234567"
api_key = "k1"

[[instances]]
phone_number = "+15557654321"
api_key = "  k2  "
"#;

        let config = GatewayConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8088");
        assert_eq!(config.shutdown_grace(), Duration::from_secs(5));
        assert_eq!(config.bulk.max_messages, 50);
        assert_eq!(config.transport_timeout(), Duration::from_secs(10));
        assert_eq!(config.tenants()[1].api_key, "k2");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("RELAY_TEST_API_KEY", "from-env");

        let toml_content = r#"
[transport]
endpoint = "http://localhost:8080"

[[instances]]
phone_number = "+15551234567"
api_key = "${RELAY_TEST_API_KEY}"
"#;

        let config = GatewayConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.instances[0].api_key, "from-env");

        std::env::remove_var("RELAY_TEST_API_KEY");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let toml_content = r#"
[transport]
endpoint = "http://localhost:8080"

[[instances]]
phone_number = "+15551234567"
api_key = "${RELAY_TEST_DEFINITELY_UNSET}"
"#;

        let config = GatewayConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.instances[0].api_key, "${RELAY_TEST_DEFINITELY_UNSET}");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_failures() {
        let mut config = GatewayConfig::from_toml_str(MINIMAL).unwrap();
        config.transport.endpoint = "invalid-url".to_string();
        assert!(config.validate().is_err());

        let mut config = GatewayConfig::from_toml_str(MINIMAL).unwrap();
        config.bulk.min_delay_ms = 900;
        assert!(config.validate().is_err());

        let mut config = GatewayConfig::from_toml_str(MINIMAL).unwrap();
        config.instances.clear();
        assert!(matches!(
            config.validate(),
            Err(GatewayError::MissingConfigError { .. })
        ));

        let mut config = GatewayConfig::from_toml_str(MINIMAL).unwrap();
        config.instances[0].phone_number = "5551234567".to_string();
        assert!(config.validate().is_err());

        let mut config = GatewayConfig::from_toml_str(MINIMAL).unwrap();
        config.instances[0].api_key = "   ".to_string();
        assert!(config.validate().is_err());

        let mut config = GatewayConfig::from_toml_str(MINIMAL).unwrap();
        let mut twin = config.instances[0].clone();
        twin.phone_number = "+15550000000".to_string();
        config.instances.push(twin);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let err = GatewayConfig::from_toml_str("[transport\nendpoint = ").unwrap_err();
        assert!(matches!(err, GatewayError::ConfigParseError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = GatewayConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.transport.endpoint, "http://localhost:8080");
    }

    #[test]
    fn test_missing_file() {
        let err = GatewayConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, GatewayError::IoError(_)));
    }
}
