//! Adapter for mail clients.

use async_trait::async_trait;

use super::{host_unavailable, HostAdapter, HostKind};
use crate::errors::AssistError;

/// Native surface of a mail client: the item being composed or read exposes
/// its body asynchronously, coerced to plain text (markup discarded by the
/// host), and accepts writes at the current body selection.
#[async_trait]
pub trait MailSurface: Send + Sync {
    /// Message body as plain text.
    async fn body_text(&self) -> anyhow::Result<String>;

    /// Replace the currently selected body range with plain text and commit.
    async fn set_selected_text(&self, text: &str) -> anyhow::Result<()>;
}

pub struct MailAdapter<S> {
    surface: S,
}

impl<S: MailSurface> MailAdapter<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }
}

#[async_trait]
impl<S: MailSurface> HostAdapter for MailAdapter<S> {
    fn kind(&self) -> HostKind {
        HostKind::MailClient
    }

    async fn get_selection(&self) -> Result<String, AssistError> {
        self.surface.body_text().await.map_err(host_unavailable)
    }

    async fn replace_selection(&self, text: &str) -> Result<(), AssistError> {
        self.surface
            .set_selected_text(text)
            .await
            .map_err(host_unavailable)
    }
}
