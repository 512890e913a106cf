//! Wire encoding of captured context as a chat attachment.
//!
//! The snapshot travels as a `file` attachment whose value is
//! `<marker>:<json>`, which the backend tells apart from user-attached files
//! by the marker prefix.

use crate::{config::AttachmentConfig, error::Result, types::ContextSnapshot};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    File,
    Notebook,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    pub value: String,
}

impl Attachment {
    pub fn file(value: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: AttachmentKind::File,
            value: value.into(),
        }
    }
}

fn prefix(config: &AttachmentConfig) -> String {
    format!("{}:", config.marker)
}

pub fn encode_snapshot(snapshot: &ContextSnapshot, config: &AttachmentConfig) -> Result<String> {
    let json = serde_json::to_string(snapshot)?;
    Ok(format!("{}{}", prefix(config), json))
}

pub fn is_context_value(value: &str, config: &AttachmentConfig) -> bool {
    value.starts_with(&prefix(config))
}

pub fn is_context_attachment(attachment: &Attachment, config: &AttachmentConfig) -> bool {
    attachment.kind == AttachmentKind::File && is_context_value(&attachment.value, config)
}

/// Decode a marker-prefixed value. Unmarked values and malformed JSON both
/// yield `None`; the latter is logged.
pub fn decode_value(value: &str, config: &AttachmentConfig) -> Option<ContextSnapshot> {
    let json = value.strip_prefix(&prefix(config))?;
    match serde_json::from_str(json) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::warn!("Failed to decode active context attachment: {}", e);
            None
        }
    }
}

/// First decodable context attachment among `attachments`.
pub fn find_active_context(
    attachments: &[Attachment],
    config: &AttachmentConfig,
) -> Option<ContextSnapshot> {
    attachments
        .iter()
        .filter(|attachment| is_context_attachment(attachment, config))
        .find_map(|attachment| decode_value(&attachment.value, config))
}
