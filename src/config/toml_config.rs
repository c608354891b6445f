use crate::domain::ports::{
    ConfigProvider, DEFAULT_COUNTY_LOOKBACK_MONTHS, DEFAULT_MAP_ENDPOINT, DEFAULT_MAP_REGION,
    DEFAULT_TIMEOUT_SECONDS,
};
use crate::utils::error::{BuddyError, Result};
use crate::utils::validation::{validate_provider, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api: ApiConfig,
    pub maps: Option<MapsConfig>,
    pub query: Option<QueryConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapsConfig {
    pub endpoint: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    pub county_lookback_months: Option<u32>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BuddyError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BuddyError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_ENDPOINT})，未設定的保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BuddyError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_endpoint(&self) -> &str {
        &self.api.endpoint
    }

    fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn map_endpoint(&self) -> &str {
        self.maps
            .as_ref()
            .and_then(|maps| maps.endpoint.as_deref())
            .unwrap_or(DEFAULT_MAP_ENDPOINT)
    }

    fn map_region(&self) -> &str {
        self.maps
            .as_ref()
            .and_then(|maps| maps.region.as_deref())
            .unwrap_or(DEFAULT_MAP_REGION)
    }

    fn county_lookback_months(&self) -> u32 {
        self.query
            .as_ref()
            .and_then(|query| query.county_lookback_months)
            .unwrap_or(DEFAULT_COUNTY_LOOKBACK_MONTHS)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config() {
        let toml_content = r#"
[api]
endpoint = "https://api.example.com/stockings"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api_endpoint(), "https://api.example.com/stockings");
        assert_eq!(config.timeout_seconds(), 10);
        assert_eq!(config.map_endpoint(), DEFAULT_MAP_ENDPOINT);
        assert_eq!(config.map_region(), "VA");
        assert_eq!(config.county_lookback_months(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[api]
endpoint = "https://api.example.com/stockings"
timeout_seconds = 5

[maps]
endpoint = "https://maps.example.com/staticmap"
region = "WV"

[query]
county_lookback_months = 3
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.timeout_seconds(), 5);
        assert_eq!(config.map_endpoint(), "https://maps.example.com/staticmap");
        assert_eq!(config.map_region(), "WV");
        assert_eq!(config.county_lookback_months(), 3);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TROUT_BUDDY_TEST_ENDPOINT", "https://test.api.com/stockings");

        let toml_content = r#"
[api]
endpoint = "${TROUT_BUDDY_TEST_ENDPOINT}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api.endpoint, "https://test.api.com/stockings");

        std::env::remove_var("TROUT_BUDDY_TEST_ENDPOINT");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[api]
endpoint = "invalid-url"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let zero_timeout = TomlConfig::from_toml_str(
            r#"
[api]
endpoint = "https://api.example.com"
timeout_seconds = 0
"#,
        )
        .unwrap();
        assert!(zero_timeout.validate().is_err());
    }

    #[test]
    fn test_missing_api_section() {
        assert!(matches!(
            TomlConfig::from_toml_str("[maps]\nregion = \"VA\"\n"),
            Err(BuddyError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[api]
endpoint = "https://api.example.com"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.api_endpoint(), "https://api.example.com");
    }
}
