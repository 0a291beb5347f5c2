//! Adapter for grid-based spreadsheet hosts.

use async_trait::async_trait;

use super::{host_unavailable, HostAdapter, HostKind};
use crate::errors::AssistError;

/// Native surface of a spreadsheet: the selection is a rectangular range of
/// cells with display text, anchored at its top-left cell.
#[async_trait]
pub trait SpreadsheetSurface: Send + Sync {
    /// Display text of every cell in the selected range, row-major. Empty when
    /// nothing is selected.
    async fn selected_grid(&self) -> anyhow::Result<Vec<Vec<String>>>;

    /// Write a single value into the anchor (top-left) cell of the selection
    /// and commit.
    async fn write_anchor_cell(&self, value: &str) -> anyhow::Result<()>;
}

pub struct SpreadsheetAdapter<S> {
    surface: S,
}

impl<S: SpreadsheetSurface> SpreadsheetAdapter<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }
}

/// Join rule for multi-cell ranges: cells within a row are joined with a tab,
/// rows with a newline.
fn join_grid(grid: &[Vec<String>]) -> String {
    grid.iter()
        .map(|row| row.join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl<S: SpreadsheetSurface> HostAdapter for SpreadsheetAdapter<S> {
    fn kind(&self) -> HostKind {
        HostKind::Spreadsheet
    }

    async fn get_selection(&self) -> Result<String, AssistError> {
        let grid = self.surface.selected_grid().await.map_err(host_unavailable)?;
        Ok(join_grid(&grid))
    }

    async fn replace_selection(&self, text: &str) -> Result<(), AssistError> {
        self.surface
            .write_anchor_cell(text)
            .await
            .map_err(host_unavailable)
    }
}
