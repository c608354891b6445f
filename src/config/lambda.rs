use crate::domain::ports::{
    ConfigProvider, DEFAULT_API_ENDPOINT, DEFAULT_COUNTY_LOOKBACK_MONTHS, DEFAULT_MAP_ENDPOINT,
    DEFAULT_MAP_REGION, DEFAULT_TIMEOUT_SECONDS,
};
use crate::utils::error::{BuddyError, Result};
use crate::utils::validation::{validate_provider, Validate};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub api_endpoint: String,
    pub timeout_seconds: u64,
    pub map_endpoint: String,
    pub map_region: String,
    pub county_lookback_months: u32,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 方便測試時不動到行程環境變數
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            api_endpoint: lookup("API_ENDPOINT").unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string()),
            timeout_seconds: parse_var(&lookup, "REQUEST_TIMEOUT_SECONDS", DEFAULT_TIMEOUT_SECONDS)?,
            map_endpoint: lookup("MAP_ENDPOINT").unwrap_or_else(|| DEFAULT_MAP_ENDPOINT.to_string()),
            map_region: lookup("MAP_REGION").unwrap_or_else(|| DEFAULT_MAP_REGION.to_string()),
            county_lookback_months: parse_var(
                &lookup,
                "COUNTY_LOOKBACK_MONTHS",
                DEFAULT_COUNTY_LOOKBACK_MONTHS,
            )?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| BuddyError::InvalidConfigValueError {
            field: name.to_string(),
            value: raw.clone(),
            reason: "Expected a whole number".to_string(),
        }),
    }
}

impl ConfigProvider for LambdaConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn map_endpoint(&self) -> &str {
        &self.map_endpoint
    }

    fn map_region(&self) -> &str {
        &self.map_region
    }

    fn county_lookback_months(&self) -> u32 {
        self.county_lookback_months
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)?;
        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}
