use crate::domain::model::{Intent, IntentRequest};
use crate::domain::ports::{
    ConfigProvider, DEFAULT_API_ENDPOINT, DEFAULT_COUNTY_LOOKBACK_MONTHS, DEFAULT_MAP_ENDPOINT,
    DEFAULT_MAP_REGION, DEFAULT_TIMEOUT_SECONDS,
};
use crate::utils::error::{BuddyError, Result};
use crate::utils::validation::{validate_provider, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "trout-buddy")]
#[command(about = "Answer a fish stocking question locally, the way the webhook would")]
pub struct CliConfig {
    /// Dialogflow action name, e.g. StockingsByDate
    #[arg(long, default_value = "StockingsDefault")]
    pub intent: String,

    /// Intent argument as NAME=VALUE (repeatable)
    #[arg(long = "arg", value_name = "NAME=VALUE")]
    pub args: Vec<String>,

    /// Active context name (repeatable)
    #[arg(long = "context", value_name = "NAME")]
    pub contexts: Vec<String>,

    #[arg(long, help = "TOML settings file; when given, it replaces the endpoint flags")]
    pub config: Option<String>,

    #[arg(long, default_value = DEFAULT_API_ENDPOINT)]
    pub api_endpoint: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, default_value = DEFAULT_MAP_ENDPOINT)]
    pub map_endpoint: String,

    #[arg(long, default_value = DEFAULT_MAP_REGION)]
    pub map_region: String,

    #[arg(long, default_value_t = DEFAULT_COUNTY_LOOKBACK_MONTHS)]
    pub county_lookback_months: u32,

    #[arg(long, help = "Print the Dialogflow webhook JSON instead of plain text")]
    pub json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn intent_request(&self) -> Result<IntentRequest> {
        let mut request = IntentRequest::new(Intent::from_action(&self.intent));
        for arg in &self.args {
            let (name, value) = arg.split_once('=').ok_or_else(|| {
                BuddyError::InvalidConfigValueError {
                    field: "arg".to_string(),
                    value: arg.clone(),
                    reason: "Expected NAME=VALUE".to_string(),
                }
            })?;
            request = request.with_argument(name.trim(), value);
        }
        for context in &self.contexts {
            request = request.with_context(context.as_str());
        }
        Ok(request)
    }
}

impl ConfigProvider for CliConfig {
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

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)?;
        tracing::debug!("✅ CLI configuration validation passed");
        Ok(())
    }
}
