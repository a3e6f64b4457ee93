// src/llm/envelope.rs

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AppError;

/// The response shapes the completion endpoint is known to produce.
///
/// Variants are tried in declaration order; the first match wins.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// The payload itself already carries every required key.
    Record(Value),
    /// OpenAI-style `choices[0].message.content`; the text holds the JSON.
    Chat(String),
    /// A non-empty `choices` array whose first message has no text content.
    EmptyChat,
    /// The record sits under a top-level `result` object.
    Wrapped(Value),
    Unrecognized,
}

impl Envelope {
    pub fn classify(payload: &Value, required: &[&str]) -> Self {
        if let Value::Object(map) = payload {
            if !required.is_empty() && required.iter().all(|key| map.contains_key(*key)) {
                return Envelope::Record(payload.clone());
            }
        }

        if let Some(first) = payload
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
        {
            let content = first
                .get("message")
                .and_then(|message| message.get("content"))
                .and_then(Value::as_str);
            return match content {
                Some(text) => Envelope::Chat(text.to_string()),
                None => Envelope::EmptyChat,
            };
        }

        match payload.get("result") {
            Some(inner @ Value::Object(_)) => Envelope::Wrapped(inner.clone()),
            _ => Envelope::Unrecognized,
        }
    }
}

fn parse_failure(err: serde_json::Error, raw: &Value) -> AppError {
    AppError::Upstream {
        error: "Failed to parse completion content".to_string(),
        message: err.to_string(),
        raw: Some(raw.clone()),
    }
}

/// Normalizes a completion payload into `T`.
///
/// `required` lists the keys that identify an already-unwrapped record.
/// Any failure carries the raw payload for diagnosis.
pub fn extract<T: DeserializeOwned>(payload: &Value, required: &[&str]) -> Result<T, AppError> {
    let record = match Envelope::classify(payload, required) {
        Envelope::Record(record) | Envelope::Wrapped(record) => record,
        Envelope::Chat(text) => {
            serde_json::from_str::<Value>(&text).map_err(|e| parse_failure(e, payload))?
        }
        Envelope::EmptyChat => {
            return Err(AppError::Upstream {
                error: "Failed to parse completion content".to_string(),
                message: "choices[0].message.content is missing or not a string".to_string(),
                raw: Some(payload.clone()),
            });
        }
        Envelope::Unrecognized => {
            return Err(AppError::Upstream {
                error: "Unknown completion response structure".to_string(),
                message: "Response matched none of the known shapes".to_string(),
                raw: Some(payload.clone()),
            });
        }
    };

    serde_json::from_value(record).map_err(|e| parse_failure(e, payload))
}
