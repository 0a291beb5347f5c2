//! Adapter for shape-based presentation hosts.

use async_trait::async_trait;

use super::{host_unavailable, HostAdapter, HostKind};
use crate::errors::AssistError;

/// Snapshot of one shape in the current selection. `text` carries the shape's
/// text-frame content; shapes without a text frame report `None`.
#[derive(Debug, Clone, Default)]
pub struct SelectedShape {
    pub text: Option<String>,
}

/// Native surface of a presentation editor: the selection is an ordered set of
/// shapes, some of which expose a text frame.
#[async_trait]
pub trait PresentationSurface: Send + Sync {
    async fn selected_shapes(&self) -> anyhow::Result<Vec<SelectedShape>>;

    /// Overwrite the text frame of the shape at `index` in the current
    /// selection and commit. Only called for shapes known to have one.
    async fn set_shape_text(&self, index: usize, text: &str) -> anyhow::Result<()>;
}

pub struct PresentationAdapter<S> {
    surface: S,
}

impl<S: PresentationSurface> PresentationAdapter<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }
}

#[async_trait]
impl<S: PresentationSurface> HostAdapter for PresentationAdapter<S> {
    fn kind(&self) -> HostKind {
        HostKind::Presentation
    }

    async fn get_selection(&self) -> Result<String, AssistError> {
        let shapes = self
            .surface
            .selected_shapes()
            .await
            .map_err(host_unavailable)?;
        let mut text = String::new();
        for shape in &shapes {
            if let Some(frame_text) = &shape.text {
                text.push_str(frame_text);
                text.push('\n');
            }
        }
        // One separator per text frame; the last one is not part of the selection.
        if text.ends_with('\n') {
            text.pop();
        }
        Ok(text)
    }

    /// Writes into the first selected shape that has a text frame; a selection
    /// with no such shape is a no-op, not an error.
    async fn replace_selection(&self, text: &str) -> Result<(), AssistError> {
        let shapes = self
            .surface
            .selected_shapes()
            .await
            .map_err(host_unavailable)?;
        let target = shapes.iter().position(|shape| shape.text.is_some());
        if let Some(index) = target {
            self.surface
                .set_shape_text(index, text)
                .await
                .map_err(host_unavailable)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakeDeck {
        shapes: Mutex<Vec<Option<String>>>,
    }

    impl FakeDeck {
        fn new(shapes: Vec<Option<&str>>) -> Self {
            Self {
                shapes: Mutex::new(
                    shapes
                        .into_iter()
                        .map(|s| s.map(String::from))
                        .collect(),
                ),
            }
        }
    }

    #[async_trait]
    impl PresentationSurface for FakeDeck {
        async fn selected_shapes(&self) -> anyhow::Result<Vec<SelectedShape>> {
            Ok(self
                .shapes
                .lock()
                .unwrap()
                .iter()
                .map(|text| SelectedShape { text: text.clone() })
                .collect())
        }

        async fn set_shape_text(&self, index: usize, text: &str) -> anyhow::Result<()> {
            self.shapes.lock().unwrap()[index] = Some(text.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn text_frames_join_with_newline_and_trailing_separator_is_trimmed() {
        let adapter =
            PresentationAdapter::new(FakeDeck::new(vec![None, Some("A"), Some("B")]));
        assert_eq!(adapter.get_selection().await.unwrap(), "A\nB");
    }

    #[tokio::test]
    async fn replace_targets_first_shape_with_a_text_frame() {
        let deck = FakeDeck::new(vec![None, Some("A"), Some("B")]);
        let adapter = PresentationAdapter::new(deck);
        adapter.replace_selection("revised").await.unwrap();
        assert_eq!(adapter.get_selection().await.unwrap(), "revised\nB");
    }

    #[tokio::test]
    async fn replace_with_no_text_frame_is_a_no_op() {
        let adapter = PresentationAdapter::new(FakeDeck::new(vec![None, None]));
        adapter.replace_selection("ignored").await.unwrap();
        assert_eq!(adapter.get_selection().await.unwrap(), "");
    }

    #[tokio::test]
    async fn single_frame_round_trip_is_idempotent() {
        let adapter = PresentationAdapter::new(FakeDeck::new(vec![Some("Agenda")]));
        let selected = adapter.get_selection().await.unwrap();
        adapter.replace_selection(&selected).await.unwrap();
        assert_eq!(adapter.get_selection().await.unwrap(), "Agenda");
    }
}
