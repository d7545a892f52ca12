//! Queue message carrying an import request.

use serde::{Deserialize, Serialize};

use crate::application::handlers::ImportSheetsCommand;

/// JSON body of an import request on the queue.
///
/// Timestamps stay raw strings here; they are validated by the handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSheetsMessage {
    pub process_id: String,
    pub title: String,
    pub price: String,
    pub status: String,
    pub started_at: String,
    pub ended_at: String,
    pub url: String,
}

impl ImportSheetsMessage {
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<ImportSheetsMessage> for ImportSheetsCommand {
    fn from(msg: ImportSheetsMessage) -> Self {
        Self {
            process_id: msg.process_id,
            title: msg.title,
            price: msg.price,
            status: msg.status,
            started_at: msg.started_at,
            ended_at: msg.ended_at,
            url: msg.url,
        }
    }
}
