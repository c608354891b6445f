use chrono::Local;
use clap::Parser;
use trout_buddy::adapters::dialogflow::WebhookResponse;
use trout_buddy::domain::model::FormattedResponse;
use trout_buddy::domain::ports::ConfigProvider;
use trout_buddy::utils::error::ErrorCategory;
use trout_buddy::utils::logger;
use trout_buddy::{BuddyError, CliConfig, TomlConfig, WebhookHandler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let response = match run(&config).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("❌ {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e);
            let exit_code = match e.category() {
                ErrorCategory::Configuration => 1,
                ErrorCategory::Date => 2,
                ErrorCategory::Communication => 3,
                ErrorCategory::Internal => 4,
            };
            std::process::exit(exit_code);
        }
    };

    if config.json {
        let payload = WebhookResponse::from(response);
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_response(&response);
    }

    Ok(())
}

async fn run(config: &CliConfig) -> Result<FormattedResponse, BuddyError> {
    let request = config.intent_request()?;

    let handler = match &config.config {
        Some(path) => {
            tracing::info!("📄 Loading settings from {}", path);
            build_handler(&TomlConfig::from_file(path)?)?
        }
        None => build_handler(config)?,
    };

    Ok(handler.handle(&request, Local::now().naive_local()).await)
}

fn build_handler<C: ConfigProvider + ?Sized>(
    config: &C,
) -> Result<WebhookHandler<trout_buddy::HttpStockingSource>, BuddyError> {
    tracing::info!("🌐 Using stocking API at {}", config.api_endpoint());
    WebhookHandler::from_config(config)
}

fn print_response(response: &FormattedResponse) {
    println!("{}", response.display_text);
    println!();
    println!("🔊 {}", response.speech_markup);

    if let Some(card) = &response.map_card {
        println!();
        println!("🗺️  {}", card.title);
        for marker in &card.markers {
            println!("  {}. {} ({})", marker.index, marker.water, marker.county);
        }
        println!("  {}", card.larger_map_url);
    }

    if !response.expect_user_response {
        println!();
        println!("(conversation ends)");
    }
}
