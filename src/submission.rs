//! Before-send hook that attaches captured context to outgoing chat messages

use crate::{
    attachment::{Attachment, encode_snapshot, is_context_attachment},
    context::ContextCapture,
    error::Result,
};
use async_trait::async_trait;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::{panic::AssertUnwindSafe, sync::Arc};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub body: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl OutgoingMessage {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            attachments: Vec::new(),
        }
    }
}

#[async_trait]
pub trait BeforeSendHook: Send + Sync {
    /// Runs once per submission before the message leaves the client. Hooks
    /// cannot veto the send.
    async fn before_send(&self, message: &mut OutgoingMessage);
}

#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, message: OutgoingMessage) -> Result<()>;
}

/// Attaches the active context snapshot to every outgoing message.
#[derive(Debug, Clone)]
pub struct ActiveContextHook {
    capture: ContextCapture,
}

impl ActiveContextHook {
    pub fn new(capture: ContextCapture) -> Self {
        Self { capture }
    }

    async fn build_attachment(&self) -> Result<Option<Attachment>> {
        let snapshot = self.capture.capture().await;
        if snapshot.is_empty() {
            return Ok(None);
        }

        let value = encode_snapshot(&snapshot, &self.capture.config().attachment)?;
        Ok(Some(Attachment::file(value)))
    }
}

#[async_trait]
impl BeforeSendHook for ActiveContextHook {
    async fn before_send(&self, message: &mut OutgoingMessage) {
        // Host collaborators are foreign code; a panic in them must not take
        // the send down with it.
        let outcome = AssertUnwindSafe(self.build_attachment())
            .catch_unwind()
            .await;

        let attachment = match outcome {
            Ok(Ok(Some(attachment))) => attachment,
            Ok(Ok(None)) => {
                debug!("No active context to attach");
                return;
            }
            Ok(Err(e)) => {
                warn!("Failed to attach active context: {}", e);
                return;
            }
            Err(_) => {
                warn!("Active context capture panicked; sending without context");
                return;
            }
        };

        let config = &self.capture.config().attachment;
        message
            .attachments
            .retain(|existing| !is_context_attachment(existing, config));
        message.attachments.push(attachment);
        debug!("Attached active context ({} attachments)", message.attachments.len());
    }
}

/// Chat input pipeline: runs hooks in registration order, then sends.
#[derive(Default)]
pub struct ChatInput {
    hooks: Vec<Arc<dyn BeforeSendHook>>,
}

impl ChatInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, hook: Arc<dyn BeforeSendHook>) {
        self.hooks.push(hook);
    }

    pub async fn prepare(&self, mut message: OutgoingMessage) -> OutgoingMessage {
        for hook in &self.hooks {
            hook.before_send(&mut message).await;
        }
        message
    }

    pub async fn submit(&self, message: OutgoingMessage, sink: &dyn MessageSink) -> Result<()> {
        let message = self.prepare(message).await;
        sink.send(message).await
    }
}

impl std::fmt::Debug for ChatInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatInput")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
