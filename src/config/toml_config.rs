use crate::core::balance::DEFAULT_TARGET_GHG;
use crate::utils::error::{FleetError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub compliance: ComplianceConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_prefix: String,
    pub cors: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceConfig {
    /// gCO2e/MJ
    pub target_ghg: f64,
    pub year_min: i32,
    pub year_max: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// 未設定時使用內建的參考航線
    pub routes_csv: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            api_prefix: "/api".to_string(),
            cors: true,
        }
    }
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            target_ghg: DEFAULT_TARGET_GHG,
            year_min: 2000,
            year_max: 2100,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 檔案不存在時回傳 `None`
    ///
    /// 在日誌初始化之前呼叫，因此這裡不記錄任何事，由呼叫端決定如何回報。
    pub fn from_file_if_exists<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FleetError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ROUTES_CSV})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FleetError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// `PORT` 環境變數覆蓋設定檔中的埠號
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port.parse().map_err(|_| FleetError::InvalidConfigValueError {
                field: "PORT".to_string(),
                value: port.clone(),
                reason: "Port must be an integer between 1 and 65535".to_string(),
            })?;
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.server.host)?;
        validation::validate_range("server.port", self.server.port, 1, u16::MAX)?;

        if !self.server.api_prefix.starts_with('/') {
            return Err(FleetError::InvalidConfigValueError {
                field: "server.api_prefix".to_string(),
                value: self.server.api_prefix.clone(),
                reason: "Prefix must start with '/'".to_string(),
            });
        }

        let target = self.compliance.target_ghg;
        if !target.is_finite() || target <= 0.0 {
            return Err(FleetError::InvalidConfigValueError {
                field: "compliance.target_ghg".to_string(),
                value: target.to_string(),
                reason: "Target must be a positive number".to_string(),
            });
        }

        if self.compliance.year_min > self.compliance.year_max {
            return Err(FleetError::InvalidConfigValueError {
                field: "compliance.year_min".to_string(),
                value: self.compliance.year_min.to_string(),
                reason: format!(
                    "year_min must not exceed year_max ({})",
                    self.compliance.year_max
                ),
            });
        }

        if let Some(csv_path) = &self.store.routes_csv {
            validation::validate_path("store.routes_csv", csv_path)?;
        }

        match self.logging.level.to_ascii_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(FleetError::InvalidConfigValueError {
                field: "logging.level".to_string(),
                value: other.to_string(),
                reason: "Valid levels: trace, debug, info, warn, error".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.server.api_prefix, "/api");
        assert_eq!(config.compliance.target_ghg, DEFAULT_TARGET_GHG);
        assert_eq!(config.compliance.year_min, 2000);
        assert_eq!(config.compliance.year_max, 2100);
        assert!(config.store.routes_csv.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 8080
api_prefix = "/v1"
cors = false

[compliance]
target_ghg = 91.16
year_min = 2020
year_max = 2050

[store]
routes_csv = "data/routes.csv"

[logging]
level = "debug"
json = true
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.server.api_prefix, "/v1");
        assert!(!config.server.cors);
        assert_eq!(config.compliance.target_ghg, 91.16);
        assert_eq!(config.store.routes_csv.as_deref(), Some("data/routes.csv"));
        assert!(config.logging.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MARINE_FLEET_TEST_CSV", "/srv/fleet/routes.csv");

        let toml_content = r#"
[store]
routes_csv = "${MARINE_FLEET_TEST_CSV}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.store.routes_csv.as_deref(),
            Some("/srv/fleet/routes.csv")
        );

        std::env::remove_var("MARINE_FLEET_TEST_CSV");
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::from_toml_str(
            r#"
[compliance]
year_min = 2100
year_max = 2000
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str("[server]\napi_prefix = \"api\"\n").unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str("[compliance]\ntarget_ghg = -1.0\n").unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[server\nport = ").unwrap_err();
        assert!(matches!(err, FleetError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nport = 4000\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_missing_file_is_none() {
        assert!(AppConfig::from_file_if_exists("/nonexistent/fleet.toml")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_existing_file_is_loaded() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[server]\nport = 4100").unwrap();

        let config = AppConfig::from_file_if_exists(temp_file.path())
            .unwrap()
            .unwrap();
        assert_eq!(config.server.port, 4100);
    }
}
