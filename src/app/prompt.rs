// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/prompt.rs
//
// Asynchronous text input for the Text tool.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::sync::{mpsc, oneshot};

use crate::app::message::TextRequest;

/// Source of labels for text stamps. `None` means the user dismissed the
/// request.
pub trait TextPrompt: Send + Sync {
    fn request(&self, request: TextRequest) -> BoxFuture<'_, Option<String>>;
}

/// Answers every request with the same value.
#[derive(Debug, Clone, Default)]
pub struct FixedPrompt(pub Option<String>);

impl FixedPrompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self(Some(text.into()))
    }
}

impl TextPrompt for FixedPrompt {
    fn request(&self, _request: TextRequest) -> BoxFuture<'_, Option<String>> {
        futures_util::future::ready(self.0.clone()).boxed()
    }
}

/// A request forwarded to whoever answers prompts.
#[derive(Debug)]
pub struct PendingText {
    pub request: TextRequest,
    reply: oneshot::Sender<Option<String>>,
}

impl PendingText {
    /// Send the answer back. A dropped requester is not an error.
    pub fn answer(self, text: Option<String>) {
        if self.reply.send(text).is_err() {
            log::debug!("Text request was abandoned before it was answered");
        }
    }
}

/// Forwards requests over a channel; another task answers them.
#[derive(Debug, Clone)]
pub struct ChannelPrompt {
    requests: mpsc::UnboundedSender<PendingText>,
}

impl ChannelPrompt {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PendingText>) {
        let (requests, rx) = mpsc::unbounded_channel();
        (Self { requests }, rx)
    }
}

impl TextPrompt for ChannelPrompt {
    fn request(&self, request: TextRequest) -> BoxFuture<'_, Option<String>> {
        async move {
            let (reply, answer) = oneshot::channel();
            if self.requests.send(PendingText { request, reply }).is_err() {
                log::warn!("Nobody is listening for text requests");
                return None;
            }
            answer.await.ok().flatten()
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn request() -> TextRequest {
        TextRequest {
            at: Point::new(3.0, 4.0),
        }
    }

    #[tokio::test]
    async fn fixed_prompt_answers_immediately() {
        assert_eq!(FixedPrompt::new("Exhibit A").request(request()).await.as_deref(), Some("Exhibit A"));
        assert_eq!(FixedPrompt::default().request(request()).await, None);
    }

    #[tokio::test]
    async fn channel_prompt_round_trip() {
        let (prompt, mut rx) = ChannelPrompt::new();
        let responder = tokio::spawn(async move {
            let pending = rx.recv().await.unwrap();
            assert_eq!(pending.request.at, Point::new(3.0, 4.0));
            pending.answer(Some("plate".to_string()));
        });
        assert_eq!(prompt.request(request()).await.as_deref(), Some("plate"));
        responder.await.unwrap();
    }

    #[tokio::test]
    async fn dropped_responder_yields_none() {
        let (prompt, rx) = ChannelPrompt::new();
        drop(rx);
        assert_eq!(prompt.request(request()).await, None);
    }
}
