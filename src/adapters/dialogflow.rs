//! Dialogflow (v1) webhook wire format with the Actions on Google payload.

use crate::domain::model::{FormattedResponse, Intent, IntentRequest, MapCard};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookRequest {
    #[serde(default)]
    pub result: QueryResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub contexts: Vec<RequestContext>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestContext {
    pub name: String,
}

impl WebhookRequest {
    pub fn into_intent_request(self) -> IntentRequest {
        let QueryResult {
            action,
            parameters,
            contexts,
        } = self.result;

        let mut request = IntentRequest::new(Intent::from_action(&action));
        // 只接受字串參數，其餘型別略過
        for (name, value) in parameters {
            if let Value::String(value) = value {
                request.arguments.insert(name, value);
            }
        }
        request.contexts = contexts.into_iter().map(|context| context.name).collect();
        request
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub speech: String,
    pub display_text: String,
    pub data: ResponseData,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseData {
    pub google: GooglePayload,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePayload {
    pub expect_user_response: bool,
    pub rich_response: RichResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct RichResponse {
    pub items: Vec<RichItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RichItem {
    SimpleResponse(SimpleResponse),
    BasicCard(BasicCard),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleResponse {
    pub text_to_speech: String,
    pub display_text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicCard {
    pub formatted_text: String,
    pub image: CardImage,
    pub buttons: Vec<CardButton>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardImage {
    pub url: String,
    pub accessibility_text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardButton {
    pub title: String,
    pub open_url_action: OpenUrlAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenUrlAction {
    pub url: String,
}

impl From<MapCard> for BasicCard {
    fn from(card: MapCard) -> Self {
        Self {
            formatted_text: card.body_text,
            image: CardImage {
                url: card.image_url,
                accessibility_text: card.title,
            },
            buttons: vec![CardButton {
                title: "Larger Map".to_string(),
                open_url_action: OpenUrlAction {
                    url: card.larger_map_url,
                },
            }],
        }
    }
}

impl From<FormattedResponse> for WebhookResponse {
    fn from(response: FormattedResponse) -> Self {
        let mut items = vec![RichItem::SimpleResponse(SimpleResponse {
            text_to_speech: response.speech_markup.clone(),
            display_text: response.display_text.clone(),
        })];
        if let Some(card) = response.map_card {
            items.push(RichItem::BasicCard(card.into()));
        }

        Self {
            speech: response.speech_markup,
            display_text: response.display_text,
            data: ResponseData {
                google: GooglePayload {
                    expect_user_response: response.expect_user_response,
                    rich_response: RichResponse { items },
                },
            },
        }
    }
}
