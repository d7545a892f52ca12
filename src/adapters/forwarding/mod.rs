//! Forwarding adapters - deliver finished drafts to the storage service.

mod http_forwarder;
mod payload;
mod recording;

pub use http_forwarder::{HttpForwarder, HttpForwarderConfig};
pub use payload::{DraftPayload, ModulePayload, OptionPayload, QuestionPayload};
pub use recording::RecordingForwarder;
