//! Host adapter layer.
//!
//! Each supported document host exposes selection state through an
//! incompatible object model (text range, value grid, shape collection, mail
//! body). One adapter per [`HostKind`] translates that native surface into the
//! two-method [`HostAdapter`] contract, so the rest of the add-in never
//! branches on the host type. Adding a fifth host means adding one variant
//! module and touching nothing else.

pub mod document;
pub mod mail;
pub mod presentation;
pub mod spreadsheet;

pub use document::{DocumentAdapter, DocumentSurface};
pub use mail::{MailAdapter, MailSurface};
pub use presentation::{PresentationAdapter, PresentationSurface, SelectedShape};
pub use spreadsheet::{SpreadsheetAdapter, SpreadsheetSurface};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AssistError;

/// The document host this session is embedded in. Determined once at startup
/// from the hosting environment and immutable for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostKind {
    DocumentEditor,
    Spreadsheet,
    Presentation,
    MailClient,
}

impl HostKind {
    /// Map the hosting environment's identifier onto a kind. Accepts both the
    /// generic names and the common host application names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "document-editor" | "document" | "word" => Some(Self::DocumentEditor),
            "spreadsheet" | "excel" => Some(Self::Spreadsheet),
            "presentation" | "powerpoint" => Some(Self::Presentation),
            "mail-client" | "mail" | "outlook" => Some(Self::MailClient),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::DocumentEditor => "document editor",
            Self::Spreadsheet => "spreadsheet",
            Self::Presentation => "presentation",
            Self::MailClient => "mail client",
        }
    }
}

impl std::fmt::Display for HostKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Uniform selection contract over all host kinds.
///
/// `get_selection` returns an empty string when nothing is selected; an empty
/// selection is a caller-level validation concern, never an adapter failure.
/// Both methods fail with [`AssistError::HostUnavailable`] only when the host
/// runtime itself cannot be reached, and perform exactly one host commit per
/// call.
#[async_trait]
pub trait HostAdapter: Send + Sync {
    fn kind(&self) -> HostKind;

    async fn get_selection(&self) -> Result<String, AssistError>;

    async fn replace_selection(&self, text: &str) -> Result<(), AssistError>;
}

pub(crate) fn host_unavailable(err: anyhow::Error) -> AssistError {
    AssistError::HostUnavailable(err.to_string())
}
