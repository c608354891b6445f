pub mod dates;
pub mod formatter;
pub mod grammar;
pub mod webhook;

pub use crate::domain::model::{DateRange, FormattedResponse, IntentRequest, StockingRecord};
pub use crate::domain::ports::{ConfigProvider, StockingSource};
pub use crate::utils::error::Result;
