//! Message types and the channel trait.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::ChannelError;

/// A chat message addressed to the skill. Only `content` is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// Source channel name, for logs.
    #[serde(default)]
    pub channel: String,
    /// Raw message text. May be absent.
    #[serde(default)]
    pub content: Option<String>,
}

impl IncomingMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            channel: String::new(),
            content: Some(content.into()),
        }
    }

    /// Tag the message with its source channel.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }
}

/// The reply sent back on a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingResponse {
    pub content: String,
}

impl OutgoingResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Stream of incoming messages from a channel.
pub type MessageStream = Pin<Box<dyn Stream<Item = IncomingMessage> + Send>>;

/// A source of messages and a sink for replies.
#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;

    /// Start receiving messages.
    async fn start(&self) -> Result<MessageStream, ChannelError>;

    /// Send a reply to a previously received message.
    async fn respond(
        &self,
        msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError>;
}
