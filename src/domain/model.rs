use crate::utils::error::{BuddyError, Result};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// 單次放流紀錄 (由遠端 API 回傳)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockingRecord {
    pub water: String,
    pub county: String,
    #[serde(deserialize_with = "deserialize_record_date")]
    pub date: NaiveDate,
}

impl StockingRecord {
    pub fn new(water: impl Into<String>, county: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            water: water.into(),
            county: county.into(),
            date,
        }
    }
}

/// API 可能回傳 `2018-03-15` 或完整的 RFC 3339 時間戳
fn deserialize_record_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_record_date(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("unrecognized stocking date: {}", raw))
    })
}

fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(BuddyError::InvalidDateRange { start, end });
            }
        }
        Ok(Self { start, end })
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: Some(date),
            end: Some(date),
        }
    }

    /// 不帶日期條件，由 API 回傳最新資料
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    /// 沒有結束日時沿用開始日
    pub fn end(&self) -> Option<NaiveDate> {
        self.end.or(self.start)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapMarker {
    pub index: usize,
    pub water: String,
    pub county: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapCard {
    pub title: String,
    pub markers: Vec<MapMarker>,
    pub body_text: String,
    pub image_url: String,
    pub larger_map_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedResponse {
    pub speech_markup: String,
    pub display_text: String,
    pub map_card: Option<MapCard>,
    pub expect_user_response: bool,
}

impl FormattedResponse {
    pub fn ask(speech_markup: String, display_text: String) -> Self {
        Self {
            speech_markup,
            display_text,
            map_card: None,
            expect_user_response: true,
        }
    }

    pub fn tell(speech_markup: String, display_text: String) -> Self {
        Self {
            expect_user_response: false,
            ..Self::ask(speech_markup, display_text)
        }
    }

    pub fn with_map_card(mut self, card: MapCard) -> Self {
        self.map_card = Some(card);
        self
    }

    pub fn keep_open(mut self, expect_user_response: bool) -> Self {
        self.expect_user_response = expect_user_response;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Welcome,
    Unknown,
    Fallback,
    StockingsByCounty,
    StockingsByDate,
    StockingsDefault,
}

impl Intent {
    pub const ALL: [Intent; 6] = [
        Intent::Welcome,
        Intent::Unknown,
        Intent::Fallback,
        Intent::StockingsByCounty,
        Intent::StockingsByDate,
        Intent::StockingsDefault,
    ];

    pub fn action_name(&self) -> &'static str {
        match self {
            Intent::Welcome => "input.welcome",
            Intent::Unknown => "input.unknown",
            Intent::Fallback => "default",
            Intent::StockingsByCounty => "StockingsByCounty",
            Intent::StockingsByDate => "StockingsByDate",
            Intent::StockingsDefault => "StockingsDefault",
        }
    }

    /// 未知的 action 一律走 Fallback
    pub fn from_action(action: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|intent| intent.action_name() == action)
            .unwrap_or(Intent::Fallback)
    }
}

pub const WELCOME_CONTEXT: &str = "google_assistant_welcome";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentRequest {
    pub intent: Intent,
    pub arguments: HashMap<String, String>,
    pub contexts: Vec<String>,
}

impl IntentRequest {
    pub fn new(intent: Intent) -> Self {
        Self {
            intent,
            arguments: HashMap::new(),
            contexts: Vec::new(),
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    pub fn with_context(mut self, name: impl Into<String>) -> Self {
        self.contexts.push(name.into());
        self
    }

    /// 空字串視為未提供
    pub fn argument(&self, name: &str) -> Option<&str> {
        self.arguments
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn has_context(&self, name: &str) -> bool {
        self.contexts.iter().any(|context| context.eq_ignore_ascii_case(name))
    }
}
