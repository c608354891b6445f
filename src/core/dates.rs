use crate::utils::error::{BuddyError, Result};
use chrono::{DateTime, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};

/// 未來日期若落在此天數內，視為 "上週X" 被辨識成下週X
pub const LAST_WEEKDAY_WINDOW_DAYS: u64 = 8;

/// 將語音辨識出的日期轉成實際日期
///
/// - 未提供 (或空字串) 回傳 `Ok(None)`
/// - 四位數字視為該年 1 月 1 日
/// - 晚於 `now` 的時間：8 天內退回 7 天，否則退回一年
///
/// 只有日期的輸入以當天午夜比較；帶時間的輸入以完整時刻比較。
/// 8 天的門檻只是經驗法則：辨識器常把 "last Thursday" 解析成下一個星期四。
pub fn normalize_slot_date(value: Option<&str>, now: NaiveDateTime) -> Result<Option<NaiveDate>> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        let year = value.parse::<i32>().map_err(|_| invalid_date(value))?;
        return NaiveDate::from_ymd_opt(year, 1, 1)
            .map(Some)
            .ok_or_else(|| invalid_date(value));
    }

    let instant = parse_slot_instant(value).ok_or_else(|| invalid_date(value))?;
    let date = instant.date();
    if instant <= now {
        return Ok(Some(date));
    }

    let within_window = instant
        .checked_sub_days(Days::new(LAST_WEEKDAY_WINDOW_DAYS))
        .is_some_and(|window_start| window_start < now);
    let adjusted = if within_window {
        tracing::debug!("📅 {} is less than a week and a day ahead, assuming last week", instant);
        date.checked_sub_days(Days::new(7))
    } else {
        tracing::debug!("📅 {} is far ahead, assuming last year", instant);
        date.checked_sub_months(Months::new(12))
    };

    adjusted.map(Some).ok_or_else(|| invalid_date(value))
}

/// RFC 3339 取其自身時區的牆上時間；純日期視為當天午夜
fn parse_slot_instant(value: &str) -> Option<NaiveDateTime> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.naive_local());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(datetime);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

fn invalid_date(value: &str) -> BuddyError {
    BuddyError::InvalidDate {
        value: value.to_string(),
    }
}
