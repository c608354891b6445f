// Adapters layer: concrete implementations for external systems (remote API, webhook wire format, lambda events).

pub mod dialogflow;
pub mod http;
pub mod lambda_event;
