use crate::core::grammar::make_list_grammar;
use crate::domain::model::{FormattedResponse, MapCard, MapMarker, StockingRecord};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{BuddyError, Result};
use chrono::NaiveDate;
use url::Url;

/// 超過此筆數就不逐筆唸出
pub const MAX_RESULTS: usize = 8;

const AGENCY_ACRONYM: &str = "VDGIF";
const AGENCY_NAME: &str = "Virginia Department of Game and Inland Fisheries";
const MAP_TITLE: &str = "Trout Stocking Locations";

/// 同一份模板的兩種輸出方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStyle {
    Speech,
    Display,
}

impl RenderStyle {
    pub fn date(self, date: NaiveDate) -> String {
        match self {
            RenderStyle::Speech => format!(
                r#"<say-as interpret-as="date" format="dm">{}</say-as>"#,
                date.format("%d-%m")
            ),
            RenderStyle::Display => date.format("%b %d").to_string(),
        }
    }

    /// 逐字母唸出的縮寫
    pub fn characters(self, text: &str) -> String {
        match self {
            RenderStyle::Speech => format!(
                r#"<say-as interpret-as="characters">{}</say-as>"#,
                escape_markup(text)
            ),
            RenderStyle::Display => text.to_string(),
        }
    }

    pub fn text(self, text: &str) -> String {
        match self {
            RenderStyle::Speech => escape_markup(text),
            RenderStyle::Display => text.to_string(),
        }
    }

    fn finish(self, body: String) -> String {
        match self {
            RenderStyle::Speech => format!("<speak>{}</speak>", body),
            RenderStyle::Display => body,
        }
    }
}

fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// 以同一個模板產生 (speech, display)
fn render<F>(template: F) -> (String, String)
where
    F: Fn(RenderStyle) -> String,
{
    (
        RenderStyle::Speech.finish(template(RenderStyle::Speech)),
        RenderStyle::Display.finish(template(RenderStyle::Display)),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryContext<'a> {
    /// 最近一次放流 (取第一筆資料的日期)
    MostRecent,
    SingleDay(NaiveDate),
    Range { start: NaiveDate, end: NaiveDate },
    County(&'a str),
}

struct Grammar {
    count: usize,
}

impl Grammar {
    fn new(count: usize) -> Self {
        Self { count }
    }

    fn plural(&self) -> bool {
        self.count > 1
    }

    fn noun(&self) -> &'static str {
        if self.plural() {
            "stockings"
        } else {
            "stocking"
        }
    }

    fn verb(&self) -> &'static str {
        if self.plural() {
            "were"
        } else {
            "was"
        }
    }

    fn subject(&self) -> &'static str {
        if self.plural() {
            "They were"
        } else {
            "It was"
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResponseFormatter {
    map_endpoint: Url,
    map_region: String,
}

impl ResponseFormatter {
    pub fn new(map_endpoint: &str, map_region: impl Into<String>) -> Result<Self> {
        let map_endpoint = Url::parse(map_endpoint).map_err(|e| {
            BuddyError::InvalidConfigValueError {
                field: "map_endpoint".to_string(),
                value: map_endpoint.to_string(),
                reason: format!("Invalid URL format: {}", e),
            }
        })?;

        Ok(Self {
            map_endpoint,
            map_region: map_region.into(),
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(config.map_endpoint(), config.map_region())
    }

    pub fn format(&self, context: &QueryContext<'_>, records: &[StockingRecord]) -> FormattedResponse {
        let selected: Vec<&StockingRecord> = match context {
            QueryContext::MostRecent => match records.first() {
                Some(latest) => records
                    .iter()
                    .filter(|record| record.date == latest.date)
                    .collect(),
                None => Vec::new(),
            },
            _ => records.iter().collect(),
        };

        if selected.is_empty() {
            return self.empty_result(context);
        }

        if selected.len() > MAX_RESULTS {
            tracing::info!(
                "Too many stockings to enumerate ({} > {})",
                selected.len(),
                MAX_RESULTS
            );
            let (speech, display) = render(|_| {
                "There were too many stockings to discuss.  Try narrowing your search.".to_string()
            });
            return FormattedResponse::ask(speech, display);
        }

        let grammar = Grammar::new(selected.len());
        let (speech, display) = match *context {
            QueryContext::MostRecent => {
                let date = selected[0].date;
                render(|style| {
                    format!(
                        "The last {} {} on {}.  {} performed at {}.",
                        grammar.noun(),
                        grammar.verb(),
                        style.date(date),
                        grammar.subject(),
                        locations(&selected, style)
                    )
                })
            }
            QueryContext::SingleDay(date) => render(|style| {
                format!(
                    "On {}, there {} {} {}.  {} performed at {}.",
                    style.date(date),
                    grammar.verb(),
                    grammar.count,
                    grammar.noun(),
                    grammar.subject(),
                    locations(&selected, style)
                )
            }),
            QueryContext::Range { start, end } => render(|style| {
                format!(
                    "Between {} and {}, there {} {} {}.  {} performed at {}.",
                    style.date(start),
                    style.date(end),
                    grammar.verb(),
                    grammar.count,
                    grammar.noun(),
                    grammar.subject(),
                    locations_with_dates(&selected, style)
                )
            }),
            QueryContext::County(county) => render(|style| {
                format!(
                    "For {}, there {} {} {}.  {} performed on {}.",
                    style.text(county),
                    grammar.verb(),
                    grammar.count,
                    grammar.noun(),
                    grammar.subject(),
                    dates_with_waters(&selected, style)
                )
            }),
        };

        FormattedResponse::ask(speech, display).with_map_card(self.map_card(&selected))
    }

    fn empty_result(&self, context: &QueryContext<'_>) -> FormattedResponse {
        let (speech, display) = match *context {
            QueryContext::MostRecent => render(|style| {
                format!(
                    "The {} currently doesn't have any stocking information.",
                    style.characters(AGENCY_ACRONYM)
                )
            }),
            QueryContext::SingleDay(date) => {
                render(|style| format!("There were no stockings for {}", style.date(date)))
            }
            QueryContext::Range { start, end } => render(|style| {
                format!(
                    "There were no stockings between {} and {}",
                    style.date(start),
                    style.date(end)
                )
            }),
            QueryContext::County(county) => render(|style| {
                format!("No stocking information was found for {}", style.text(county))
            }),
        };

        FormattedResponse::ask(speech, display)
    }

    /// 錯誤轉成給使用者聽的訊息
    pub fn error_response(&self, err: &BuddyError) -> FormattedResponse {
        let (speech, display) = match err {
            BuddyError::InvalidDate { .. } => render(|style| {
                let example = NaiveDate::from_ymd_opt(2018, 2, 9).map(|d| style.date(d));
                format!(
                    "A date provided was invalid. Please try your request again using a valid date like {}.",
                    example.unwrap_or_else(|| "February 9th".to_string())
                )
            }),
            BuddyError::UnknownDate => render(|_| {
                "I sometimes have problems with dates.  Try to give a specific date like February 9th or a relative day like yesterday or last Thursday."
                    .to_string()
            }),
            BuddyError::InvalidDateRange { .. } => render(|_| {
                "An invalid date range has been provided.  Please use a valid date range."
                    .to_string()
            }),
            BuddyError::MissingCounty => render(|_| {
                "Which county would you like stocking information for?".to_string()
            }),
            _ => render(|_| format!("There was a problem communicating with the {}.", AGENCY_NAME)),
        };

        if err.invites_retry() {
            FormattedResponse::ask(speech, display)
        } else {
            FormattedResponse::tell(speech, display)
        }
    }

    pub fn map_card(&self, records: &[&StockingRecord]) -> MapCard {
        let markers: Vec<MapMarker> = records
            .iter()
            .take(MAX_RESULTS)
            .enumerate()
            .map(|(index, record)| MapMarker {
                index: index + 1,
                water: record.water.trim().to_string(),
                county: record.county.trim().to_string(),
            })
            .collect();

        let body_text = markers
            .iter()
            .map(|marker| format!("**{}.** {}", marker.index, marker.water))
            .collect::<Vec<_>>()
            .join("  ");

        MapCard {
            title: MAP_TITLE.to_string(),
            image_url: self.static_map_url(&markers, 192),
            larger_map_url: self.static_map_url(&markers, 340),
            body_text,
            markers,
        }
    }

    fn static_map_url(&self, markers: &[MapMarker], size: u32) -> String {
        let mut url = self.map_endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("size", &format!("{}x{}", size, size))
                .append_pair("type", "hybrid");
            for marker in markers {
                query.append_pair(
                    "markers",
                    &format!(
                        "label:{}|{},{},{}",
                        marker.index, marker.water, marker.county, self.map_region
                    ),
                );
            }
        }
        url.to_string()
    }
}

fn locations(records: &[&StockingRecord], style: RenderStyle) -> String {
    let descriptions: Vec<String> = records
        .iter()
        .map(|record| format!("{} in {}", style.text(&record.water), style.text(&record.county)))
        .collect();
    make_list_grammar(&descriptions)
}

fn locations_with_dates(records: &[&StockingRecord], style: RenderStyle) -> String {
    let descriptions: Vec<String> = records
        .iter()
        .map(|record| {
            format!(
                "{} in {} on {}",
                style.text(&record.water),
                style.text(&record.county),
                style.date(record.date)
            )
        })
        .collect();
    make_list_grammar(&descriptions)
}

fn dates_with_waters(records: &[&StockingRecord], style: RenderStyle) -> String {
    let descriptions: Vec<String> = records
        .iter()
        .map(|record| format!("{} at {}", style.date(record.date), style.text(&record.water)))
        .collect();
    make_list_grammar(&descriptions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn formatter() -> ResponseFormatter {
        ResponseFormatter::new("https://maps.example.com/staticmap", "VA").unwrap()
    }

    fn records(count: usize) -> Vec<StockingRecord> {
        (1..=count)
            .map(|i| StockingRecord::new(format!("Creek {}", i), "Bath", date(2018, 3, 14)))
            .collect()
    }

    #[test]
    fn test_render_styles() {
        let day = date(2018, 2, 9);
        assert_eq!(
            RenderStyle::Speech.date(day),
            r#"<say-as interpret-as="date" format="dm">09-02</say-as>"#
        );
        assert_eq!(RenderStyle::Display.date(day), "Feb 09");
        assert_eq!(RenderStyle::Speech.text("Lake A & B"), "Lake A &amp; B");
        assert_eq!(RenderStyle::Display.text("Lake A & B"), "Lake A & B");
    }

    #[test]
    fn test_single_day_single_record() {
        let day = date(2018, 3, 14);
        let response = formatter().format(&QueryContext::SingleDay(day), &records(1));

        assert_eq!(
            response.display_text,
            "On Mar 14, there was 1 stocking.  It was performed at Creek 1 in Bath."
        );
        assert_eq!(
            response.speech_markup,
            "<speak>On <say-as interpret-as=\"date\" format=\"dm\">14-03</say-as>, there was 1 stocking.  It was performed at Creek 1 in Bath.</speak>"
        );
        assert_eq!(response.map_card.unwrap().markers.len(), 1);
    }

    #[test]
    fn test_single_day_plural() {
        let response =
            formatter().format(&QueryContext::SingleDay(date(2018, 3, 14)), &records(3));

        assert_eq!(
            response.display_text,
            "On Mar 14, there were 3 stockings.  They were performed at Creek 1 in Bath, Creek 2 in Bath, and Creek 3 in Bath."
        );
    }

    #[test]
    fn test_range_lists_dates_in_both_styles() {
        let stockings = vec![
            StockingRecord::new("Back Creek", "Bath", date(2018, 3, 2)),
            StockingRecord::new("Cedar Run", "Fauquier", date(2018, 3, 5)),
        ];
        let context = QueryContext::Range {
            start: date(2018, 3, 1),
            end: date(2018, 3, 7),
        };
        let response = formatter().format(&context, &stockings);

        assert_eq!(
            response.display_text,
            "Between Mar 01 and Mar 07, there were 2 stockings.  They were performed at Back Creek in Bath on Mar 02, and Cedar Run in Fauquier on Mar 05."
        );
        assert!(response
            .speech_markup
            .contains(r#"Cedar Run in Fauquier on <say-as interpret-as="date" format="dm">05-03</say-as>"#));
        assert!(!response.display_text.contains("say-as"));
    }

    #[test]
    fn test_county_lists_dates() {
        let stockings = vec![
            StockingRecord::new("Back Creek", "Bath", date(2018, 3, 2)),
            StockingRecord::new("Jackson River", "Bath", date(2018, 3, 9)),
        ];
        let response = formatter().format(&QueryContext::County("Bath"), &stockings);

        assert_eq!(
            response.display_text,
            "For Bath, there were 2 stockings.  They were performed on Mar 02 at Back Creek, and Mar 09 at Jackson River."
        );
    }

    #[test]
    fn test_most_recent_keeps_only_latest_day() {
        let stockings = vec![
            StockingRecord::new("Back Creek", "Bath", date(2018, 3, 14)),
            StockingRecord::new("Dry River", "Rockingham", date(2018, 3, 14)),
            StockingRecord::new("Cedar Run", "Fauquier", date(2018, 3, 12)),
        ];
        let response = formatter().format(&QueryContext::MostRecent, &stockings);

        assert_eq!(
            response.display_text,
            "The last stockings were on Mar 14.  They were performed at Back Creek in Bath, and Dry River in Rockingham."
        );
        assert_eq!(response.map_card.unwrap().markers.len(), 2);
    }

    #[test]
    fn test_most_recent_single() {
        let stockings = vec![StockingRecord::new("Back Creek", "Bath", date(2018, 3, 14))];
        let response = formatter().format(&QueryContext::MostRecent, &stockings);

        assert_eq!(
            response.display_text,
            "The last stocking was on Mar 14.  It was performed at Back Creek in Bath."
        );
    }

    #[test]
    fn test_empty_results_reference_query() {
        let f = formatter();

        let day = f.format(&QueryContext::SingleDay(date(2018, 3, 14)), &[]);
        assert_eq!(day.display_text, "There were no stockings for Mar 14");
        assert!(day.map_card.is_none());

        let range = f.format(
            &QueryContext::Range {
                start: date(2018, 3, 1),
                end: date(2018, 3, 7),
            },
            &[],
        );
        assert_eq!(range.display_text, "There were no stockings between Mar 01 and Mar 07");

        let county = f.format(&QueryContext::County("Giles"), &[]);
        assert_eq!(county.display_text, "No stocking information was found for Giles");

        let recent = f.format(&QueryContext::MostRecent, &[]);
        assert_eq!(
            recent.speech_markup,
            r#"<speak>The <say-as interpret-as="characters">VDGIF</say-as> currently doesn't have any stocking information.</speak>"#
        );
        assert_eq!(
            recent.display_text,
            "The VDGIF currently doesn't have any stocking information."
        );
    }

    #[test]
    fn test_too_many_results_never_enumerates() {
        let stockings = records(MAX_RESULTS + 1);
        let response = formatter().format(&QueryContext::SingleDay(date(2018, 3, 14)), &stockings);

        assert_eq!(
            response.display_text,
            "There were too many stockings to discuss.  Try narrowing your search."
        );
        assert!(!response.speech_markup.contains("Creek"));
        assert!(response.map_card.is_none());

        let exactly_max = formatter().format(
            &QueryContext::SingleDay(date(2018, 3, 14)),
            &records(MAX_RESULTS),
        );
        assert!(exactly_max.display_text.contains("there were 8 stockings"));
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let f = formatter();
        let stockings = records(4);
        let context = QueryContext::County("Bath");

        assert_eq!(f.format(&context, &stockings), f.format(&context, &stockings));
    }

    #[test]
    fn test_map_card_layout() {
        let stockings = vec![
            StockingRecord::new(" Back Creek ", "Bath", date(2018, 3, 14)),
            StockingRecord::new("Dry River", "Rockingham", date(2018, 3, 14)),
        ];
        let refs: Vec<&StockingRecord> = stockings.iter().collect();
        let card = formatter().map_card(&refs);

        assert_eq!(card.title, "Trout Stocking Locations");
        assert_eq!(card.body_text, "**1.** Back Creek  **2.** Dry River");
        assert_eq!(
            card.markers[1],
            MapMarker {
                index: 2,
                water: "Dry River".to_string(),
                county: "Rockingham".to_string(),
            }
        );

        let image = Url::parse(&card.image_url).unwrap();
        let pairs: Vec<(String, String)> = image.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("size".to_string(), "192x192".to_string())));
        assert!(pairs.contains(&(
            "markers".to_string(),
            "label:1|Back Creek,Bath,VA".to_string()
        )));
        assert!(card.larger_map_url.contains("340x340"));
    }

    #[test]
    fn test_error_responses() {
        let f = formatter();

        let invalid = f.error_response(&BuddyError::InvalidDate {
            value: "someday".to_string(),
        });
        assert!(invalid.expect_user_response);
        assert_eq!(
            invalid.display_text,
            "A date provided was invalid. Please try your request again using a valid date like Feb 09."
        );
        assert!(invalid.speech_markup.contains(r#"format="dm">09-02</say-as>"#));

        let range = f.error_response(&BuddyError::InvalidDateRange {
            start: date(2018, 3, 7),
            end: date(2018, 3, 1),
        });
        assert!(!range.expect_user_response);
        assert!(range.display_text.starts_with("An invalid date range"));

        let comm = f.error_response(&BuddyError::CommunicationError {
            message: "timeout".to_string(),
        });
        assert!(!comm.expect_user_response);
        assert_eq!(
            comm.display_text,
            "There was a problem communicating with the Virginia Department of Game and Inland Fisheries."
        );
    }
}
