use crate::adapters::http::HttpStockingSource;
use crate::core::dates::normalize_slot_date;
use crate::core::formatter::{QueryContext, ResponseFormatter};
use crate::domain::model::{
    DateRange, FormattedResponse, Intent, IntentRequest, WELCOME_CONTEXT,
};
use crate::domain::ports::{ConfigProvider, StockingSource};
use crate::utils::error::{BuddyError, ErrorCategory, Result};
use crate::utils::validation::validate_provider;
use chrono::{Months, NaiveDate, NaiveDateTime};

const WELCOME_PROMPT: &str =
    "Welcome to Virginia Trout Buddy! Try asking for recent stockings or stockings on a specific day.";
const UNKNOWN_PROMPT: &str = "I'm having trouble, can you try that again?";
const FALLBACK_PROMPT: &str = "Try asking for recent stockings.";

pub const START_DATE_ARGUMENT: &str = "StartDate";
pub const END_DATE_ARGUMENT: &str = "EndDate";
pub const COUNTY_ARGUMENT: &str = "County";

pub struct WebhookHandler<S: StockingSource> {
    source: S,
    formatter: ResponseFormatter,
    county_lookback_months: u32,
}

impl WebhookHandler<HttpStockingSource> {
    /// 驗證設定後建立連線遠端 API 的 handler
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        validate_provider(config)?;
        Ok(Self::new(
            HttpStockingSource::from_config(config)?,
            ResponseFormatter::from_config(config)?,
            config.county_lookback_months(),
        ))
    }
}

impl<S: StockingSource> WebhookHandler<S> {
    pub fn new(source: S, formatter: ResponseFormatter, county_lookback_months: u32) -> Self {
        Self {
            source,
            formatter,
            county_lookback_months,
        }
    }

    /// 處理單一請求；錯誤都會轉成語音回覆，不會往外拋
    pub async fn handle(&self, request: &IntentRequest, now: NaiveDateTime) -> FormattedResponse {
        tracing::info!("🎣 {} intent received", request.intent.action_name());

        let result = match request.intent {
            Intent::Welcome => return prompt(WELCOME_PROMPT),
            Intent::Unknown => return prompt(UNKNOWN_PROMPT),
            Intent::Fallback => return prompt(FALLBACK_PROMPT),
            Intent::StockingsDefault => self.most_recent().await,
            Intent::StockingsByDate => self.by_date(request, now).await,
            Intent::StockingsByCounty => self.by_county(request, now).await,
        };

        match result {
            // 從歡迎畫面直接問的一次性問題，回答後結束對話
            Ok(response) => response.keep_open(!request.has_context(WELCOME_CONTEXT)),
            Err(e) => {
                match e.category() {
                    ErrorCategory::Date => tracing::warn!("⚠️ Rejected request: {}", e),
                    _ => tracing::error!("❌ {} failed: {}", request.intent.action_name(), e),
                }
                self.formatter.error_response(&e)
            }
        }
    }

    async fn most_recent(&self) -> Result<FormattedResponse> {
        let stockings = self.source.query(&DateRange::unbounded()).await?;
        Ok(self.formatter.format(&QueryContext::MostRecent, &stockings))
    }

    async fn by_date(&self, request: &IntentRequest, now: NaiveDateTime) -> Result<FormattedResponse> {
        let start = normalize_slot_date(request.argument(START_DATE_ARGUMENT), now)?;
        let end = normalize_slot_date(request.argument(END_DATE_ARGUMENT), now)?;

        let (context, range) = match (start, end) {
            (None, None) => return Err(BuddyError::UnknownDate),
            (Some(start), Some(end)) => {
                tracing::info!("Stockings by date range {} to {}", start, end);
                let range = DateRange::new(Some(start), Some(end))?;
                (QueryContext::Range { start, end }, range)
            }
            (Some(day), None) | (None, Some(day)) => {
                (QueryContext::SingleDay(day), DateRange::single_day(day))
            }
        };

        let stockings = self.source.query(&range).await?;
        Ok(self.formatter.format(&context, &stockings))
    }

    async fn by_county(&self, request: &IntentRequest, now: NaiveDateTime) -> Result<FormattedResponse> {
        let county = request
            .argument(COUNTY_ARGUMENT)
            .ok_or(BuddyError::MissingCounty)?;

        let today = now.date();
        let start = today
            .checked_sub_months(Months::new(self.county_lookback_months))
            .unwrap_or(NaiveDate::MIN);
        let range = DateRange::new(Some(start), Some(today))?;

        let wanted = county.to_lowercase();
        let stockings: Vec<_> = self
            .source
            .query(&range)
            .await?
            .into_iter()
            .filter(|stocking| stocking.county.trim().to_lowercase() == wanted)
            .collect();
        tracing::debug!("{} stockings matched county {}", stockings.len(), county);

        Ok(self.formatter.format(&QueryContext::County(county), &stockings))
    }
}

fn prompt(text: &str) -> FormattedResponse {
    FormattedResponse::ask(format!("<speak>{}</speak>", text), text.to_string())
}
