pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{LambdaConfig, TomlConfig};

pub use adapters::http::HttpStockingSource;
pub use core::{formatter::ResponseFormatter, webhook::WebhookHandler};
pub use utils::error::{BuddyError, Result};
