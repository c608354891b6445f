use crate::domain::model::{DateRange, StockingRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait StockingSource: Send + Sync {
    async fn query(&self, range: &DateRange) -> Result<Vec<StockingRecord>>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn map_endpoint(&self) -> &str;
    fn map_region(&self) -> &str;
    fn county_lookback_months(&self) -> u32;
}

pub const DEFAULT_API_ENDPOINT: &str =
    "https://et4vzi8cvb.execute-api.us-east-1.amazonaws.com/prod/stockings";
pub const DEFAULT_MAP_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/staticmap";
pub const DEFAULT_MAP_REGION: &str = "VA";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_COUNTY_LOOKBACK_MONTHS: u32 = 2;
