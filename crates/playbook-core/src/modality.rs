use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ModalityKind
// ---------------------------------------------------------------------------

/// The five kinds of content a response can carry. Canonical order is the
/// declaration order; every list the engine emits follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalityKind {
    Text,
    Image,
    Audio,
    Video,
    Document,
}

impl ModalityKind {
    pub fn all() -> &'static [ModalityKind] {
        &[
            ModalityKind::Text,
            ModalityKind::Image,
            ModalityKind::Audio,
            ModalityKind::Video,
            ModalityKind::Document,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModalityKind::Text => "text",
            ModalityKind::Image => "image",
            ModalityKind::Audio => "audio",
            ModalityKind::Video => "video",
            ModalityKind::Document => "document",
        }
    }

    /// Human-readable name used in missing/completed requirement lists.
    pub fn label(self) -> &'static str {
        match self {
            ModalityKind::Text => "Text",
            ModalityKind::Image => "Image",
            ModalityKind::Audio => "Audio",
            ModalityKind::Video => "Video",
            ModalityKind::Document => "Document",
        }
    }

    /// Text is typed straight into the response; everything else arrives as
    /// an uploaded attachment with a storage key.
    pub fn takes_attachments(self) -> bool {
        !matches!(self, ModalityKind::Text)
    }
}

impl fmt::Display for ModalityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModalityKind {
    type Err = crate::error::PlaybookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ModalityKind::Text),
            "image" => Ok(ModalityKind::Image),
            "audio" => Ok(ModalityKind::Audio),
            "video" => Ok(ModalityKind::Video),
            "document" => Ok(ModalityKind::Document),
            _ => Err(crate::error::PlaybookError::InvalidModality(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
