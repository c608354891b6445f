#[cfg(feature = "lambda")]
use chrono::Local;
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use serde_json::Value;
#[cfg(feature = "lambda")]
use trout_buddy::adapters::lambda_event::handle_event;
#[cfg(feature = "lambda")]
use trout_buddy::utils::logger;
#[cfg(feature = "lambda")]
use trout_buddy::utils::validation::Validate;
#[cfg(feature = "lambda")]
use trout_buddy::{HttpStockingSource, LambdaConfig, WebhookHandler};

#[cfg(feature = "lambda")]
async fn function_handler(
    handler: &WebhookHandler<HttpStockingSource>,
    event: LambdaEvent<Value>,
) -> Result<Value, Error> {
    tracing::info!("Dialogflow webhook invoked (request id {})", event.context.request_id);
    tracing::debug!("Webhook event: {}", event.payload);

    let reply = handle_event(handler, event.payload, Local::now().naive_local())
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    Ok(reply)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 冷啟動時建立一次，之後的請求共用
    let config = LambdaConfig::from_env()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    config
        .validate()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    let handler = WebhookHandler::from_config(&config)
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    let handler = &handler;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        function_handler(handler, event).await
    }))
    .await
}
