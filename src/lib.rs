//! Active context capture for chat-based coding assistants
//!
//! Before a chat message leaves the client, this library gathers lightweight
//! metadata about what the user is looking at (focused document, cursor, open
//! documents, the focused notebook cell) and attaches it to the message as a
//! tagged payload the backend can render into its system prompt.

pub mod attachment;
pub mod config;
pub mod context;
pub mod error;
pub mod fixture;
pub mod host;
pub mod prompt;
pub mod submission;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use context::ContextCapture;
pub use error::{ContextError, Result};
pub use host::HostServices;
pub use submission::{ActiveContextHook, BeforeSendHook, ChatInput, OutgoingMessage};
pub use types::*;

/// Initialize the tracing/logging subsystem
pub fn init_tracing(default_level: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("active_context={}", default_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
