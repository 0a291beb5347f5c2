//! Adapter for range-based document editors (word processors).

use async_trait::async_trait;

use super::{host_unavailable, HostAdapter, HostKind};
use crate::errors::AssistError;

/// Native surface of a range-based editor: the document exposes one selection
/// range whose text can be read and replaced in place. Each call wraps a
/// single edit-synchronisation round with the host runtime.
#[async_trait]
pub trait DocumentSurface: Send + Sync {
    /// Text of the current selection range; empty when the cursor is collapsed.
    async fn selection_text(&self) -> anyhow::Result<String>;

    /// Replace the current selection range in place and commit.
    async fn replace_range(&self, text: &str) -> anyhow::Result<()>;
}

pub struct DocumentAdapter<S> {
    surface: S,
}

impl<S: DocumentSurface> DocumentAdapter<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }
}

#[async_trait]
impl<S: DocumentSurface> HostAdapter for DocumentAdapter<S> {
    fn kind(&self) -> HostKind {
        HostKind::DocumentEditor
    }

    async fn get_selection(&self) -> Result<String, AssistError> {
        self.surface.selection_text().await.map_err(host_unavailable)
    }

    async fn replace_selection(&self, text: &str) -> Result<(), AssistError> {
        self.surface.replace_range(text).await.map_err(host_unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::Mutex;

    struct FakeDocument {
        selection: Mutex<String>,
    }

    #[async_trait]
    impl DocumentSurface for FakeDocument {
        async fn selection_text(&self) -> anyhow::Result<String> {
            Ok(self.selection.lock().unwrap().clone())
        }

        async fn replace_range(&self, text: &str) -> anyhow::Result<()> {
            *self.selection.lock().unwrap() = text.to_string();
            Ok(())
        }
    }

    struct ClosedDocument;

    #[async_trait]
    impl DocumentSurface for ClosedDocument {
        async fn selection_text(&self) -> anyhow::Result<String> {
            Err(anyhow!("document is closed"))
        }

        async fn replace_range(&self, _text: &str) -> anyhow::Result<()> {
            Err(anyhow!("document is closed"))
        }
    }

    #[tokio::test]
    async fn selection_round_trip_is_idempotent() {
        let adapter = DocumentAdapter::new(FakeDocument {
            selection: Mutex::new("quarterly report".to_string()),
        });
        let selected = adapter.get_selection().await.unwrap();
        adapter.replace_selection(&selected).await.unwrap();
        assert_eq!(adapter.get_selection().await.unwrap(), "quarterly report");
    }

    #[tokio::test]
    async fn empty_selection_is_not_an_error() {
        let adapter = DocumentAdapter::new(FakeDocument {
            selection: Mutex::new(String::new()),
        });
        assert_eq!(adapter.get_selection().await.unwrap(), "");
    }

    #[tokio::test]
    async fn runtime_fault_maps_to_host_unavailable() {
        let adapter = DocumentAdapter::new(ClosedDocument);
        let err = adapter.get_selection().await.unwrap_err();
        match err {
            AssistError::HostUnavailable(detail) => {
                assert!(detail.contains("document is closed"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
