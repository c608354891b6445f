use crate::adapters::dialogflow::{WebhookRequest, WebhookResponse};
use crate::core::webhook::WebhookHandler;
use crate::domain::ports::StockingSource;
use crate::utils::error::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::NaiveDateTime;
use serde_json::{json, Value};
use std::borrow::Cow;

/// Lambda 事件可能是 Dialogflow 請求本身，或是 API Gateway proxy 事件 (請求放在 `body`)
pub async fn handle_event<S: StockingSource>(
    handler: &WebhookHandler<S>,
    payload: Value,
    now: NaiveDateTime,
) -> Result<Value> {
    if let Some(Value::String(body)) = payload.get("body") {
        let encoded = payload
            .get("isBase64Encoded")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let body = match decode_body(body, encoded) {
            Ok(body) => body,
            Err(reason) => {
                tracing::warn!("⚠️ Undecodable webhook body: {}", reason);
                return Ok(proxy_reply(400, json!({ "error": reason }).to_string()));
            }
        };
        let request: WebhookRequest = match serde_json::from_str(&body) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("⚠️ Malformed webhook body: {}", e);
                return Ok(proxy_reply(400, json!({ "error": e.to_string() }).to_string()));
            }
        };
        let reply = respond(handler, request, now).await;
        return Ok(proxy_reply(200, serde_json::to_string(&reply)?));
    }

    let request: WebhookRequest = serde_json::from_value(payload)?;
    Ok(serde_json::to_value(respond(handler, request, now).await)?)
}

async fn respond<S: StockingSource>(
    handler: &WebhookHandler<S>,
    request: WebhookRequest,
    now: NaiveDateTime,
) -> WebhookResponse {
    let request = request.into_intent_request();
    handler.handle(&request, now).await.into()
}

/// API Gateway 可能將 body 以 base64 傳入
fn decode_body(body: &str, base64_encoded: bool) -> std::result::Result<Cow<'_, str>, String> {
    if !base64_encoded {
        return Ok(Cow::Borrowed(body));
    }
    let bytes = STANDARD
        .decode(body.trim())
        .map_err(|e| format!("invalid base64 body: {}", e))?;
    String::from_utf8(bytes)
        .map(Cow::Owned)
        .map_err(|e| format!("body is not UTF-8: {}", e))
}

fn proxy_reply(status: u16, body: String) -> Value {
    json!({
        "statusCode": status,
        "headers": { "Content-Type": "application/json" },
        "body": body,
    })
}
