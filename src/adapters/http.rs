use crate::domain::model::{DateRange, StockingRecord};
use crate::domain::ports::{ConfigProvider, StockingSource};
use crate::utils::error::{BuddyError, Result};
use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveTime, SecondsFormat, TimeZone};
use reqwest::Client;
use std::time::Duration;

/// 遠端放流資料 API
#[derive(Debug, Clone)]
pub struct HttpStockingSource {
    client: Client,
    endpoint: String,
}

impl HttpStockingSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(
            config.api_endpoint(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// 查詢參數：當地午夜，RFC 3339 (例如 `2018-03-15T00:00:00-04:00`)
pub fn query_instant(date: NaiveDate) -> String {
    let midnight = date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight).earliest() {
        Some(local) => local.to_rfc3339_opts(SecondsFormat::Secs, false),
        None => midnight.format("%Y-%m-%dT%H:%M:%S").to_string(),
    }
}

#[async_trait]
impl StockingSource for HttpStockingSource {
    async fn query(&self, range: &DateRange) -> Result<Vec<StockingRecord>> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(start) = range.start() {
            params.push(("startDate", query_instant(start)));
        }
        if let Some(end) = range.end() {
            params.push(("endDate", query_instant(end)));
        }

        tracing::debug!("Making API request to: {} {:?}", self.endpoint, params);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|e| BuddyError::CommunicationError {
                message: format!("Request to {} failed: {}", self.endpoint, e),
            })?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        if !status.is_success() {
            return Err(BuddyError::CommunicationError {
                message: format!("API returned status {}", status),
            });
        }

        let stockings: Vec<StockingRecord> =
            response
                .json()
                .await
                .map_err(|e| BuddyError::CommunicationError {
                    message: format!("Undecodable response from {}: {}", self.endpoint, e),
                })?;
        tracing::info!("{} entries found for {}", stockings.len(), self.endpoint);
        Ok(stockings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_query_instant_is_local_midnight() {
        let day = NaiveDate::from_ymd_opt(2018, 3, 15).unwrap();
        let instant = query_instant(day);

        let parsed = DateTime::parse_from_rfc3339(&instant).unwrap();
        assert_eq!(parsed.date_naive(), day);
        assert!(instant.starts_with("2018-03-15T00:00:00"));
    }
}
