use crate::modality::ModalityKind;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Evidence
// ---------------------------------------------------------------------------

/// What a snapshot knows about one modality's content.
///
/// `Pending` is locally-selected content still queued for upload. It counts
/// toward progress display but never toward completion eligibility, which is
/// what lets the UI show live progress before an async upload settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Evidence {
    #[default]
    Missing,
    Pending,
    Committed,
}

impl Evidence {
    pub fn is_present(self) -> bool {
        !matches!(self, Evidence::Missing)
    }

    pub fn is_committed(self) -> bool {
        matches!(self, Evidence::Committed)
    }
}

// ---------------------------------------------------------------------------
// PersistedStatus
// ---------------------------------------------------------------------------

/// What was last saved for (exercise, user). `Completed` locks progress
/// reporting: a completed record is never silently reclassified by
/// in-progress edits until the user explicitly reopens it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PersistedStatus {
    #[default]
    Draft,
    Completed,
}

impl fmt::Display for PersistedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PersistedStatus::Draft => "draft",
            PersistedStatus::Completed => "completed",
        })
    }
}

// ---------------------------------------------------------------------------
// ResponseSnapshot
// ---------------------------------------------------------------------------

/// Point-in-time view of a response, committed plus locally-queued content.
/// Rebuilt fresh on every render/keystroke from current form state; never
/// stored. Committed evidence always wins over queued.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseSnapshot {
    evidence: [Evidence; 5],
}

impl ResponseSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text counts as present when it is non-empty after trimming. Typed
    /// text is saved with the response record itself, so presence means
    /// committed — there is no upload to wait for.
    pub fn set_text(&mut self, text: &str) {
        self.evidence[ModalityKind::Text.index()] = if text.trim().is_empty() {
            Evidence::Missing
        } else {
            Evidence::Committed
        };
    }

    /// Record that a committed (uploaded) attachment key exists.
    pub fn record_committed(&mut self, kind: ModalityKind) {
        self.evidence[kind.index()] = Evidence::Committed;
    }

    /// Record a locally-queued file that has not finished uploading.
    pub fn record_queued(&mut self, kind: ModalityKind) {
        let slot = &mut self.evidence[kind.index()];
        if *slot != Evidence::Committed {
            *slot = Evidence::Pending;
        }
    }

    pub fn evidence(&self, kind: ModalityKind) -> Evidence {
        self.evidence[kind.index()]
    }

    pub fn is_blank(&self) -> bool {
        self.evidence.iter().all(|e| !e.is_present())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_text_is_missing() {
        let mut snap = ResponseSnapshot::new();
        snap.set_text("   \n\t ");
        assert_eq!(snap.evidence(ModalityKind::Text), Evidence::Missing);
        snap.set_text("  hello ");
        assert_eq!(snap.evidence(ModalityKind::Text), Evidence::Committed);
    }

    #[test]
    fn clearing_text_downgrades() {
        let mut snap = ResponseSnapshot::new();
        snap.set_text("draft thoughts");
        snap.set_text("");
        assert!(snap.is_blank());
    }

    #[test]
    fn committed_wins_over_queued() {
        let mut snap = ResponseSnapshot::new();
        snap.record_committed(ModalityKind::Audio);
        snap.record_queued(ModalityKind::Audio);
        assert_eq!(snap.evidence(ModalityKind::Audio), Evidence::Committed);

        // Opposite arrival order gives the same answer.
        let mut snap = ResponseSnapshot::new();
        snap.record_queued(ModalityKind::Audio);
        snap.record_committed(ModalityKind::Audio);
        assert_eq!(snap.evidence(ModalityKind::Audio), Evidence::Committed);
    }

    #[test]
    fn queued_is_present_but_not_committed() {
        let mut snap = ResponseSnapshot::new();
        snap.record_queued(ModalityKind::Video);
        let e = snap.evidence(ModalityKind::Video);
        assert!(e.is_present());
        assert!(!e.is_committed());
    }
}
