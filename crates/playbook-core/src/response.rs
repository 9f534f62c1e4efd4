use crate::error::{PlaybookError, Result};
use crate::modality::ModalityKind;
use crate::paths;
use crate::progress::ProgressReport;
use crate::requirement::RequirementSet;
use crate::snapshot::{PersistedStatus, ResponseSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// The persisted response record for one exercise: typed text plus the
/// storage keys of committed uploads, keyed by exercise slug. Locally-queued
/// files are never persisted here — callers layer those onto the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub exercise: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audio_keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub video_keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub document_keys: Vec<String>,
    #[serde(default)]
    pub status: PersistedStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Response {
    pub fn new(exercise: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            exercise: exercise.into(),
            text: String::new(),
            image_keys: Vec::new(),
            audio_keys: Vec::new(),
            video_keys: Vec::new(),
            document_keys: Vec::new(),
            status: PersistedStatus::Draft,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        let path = paths::response_path(root, slug);
        if !path.exists() {
            return Err(PlaybookError::ResponseNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        let response: Response = serde_yaml::from_str(&data)?;
        Ok(response)
    }

    pub fn load_or_new(root: &Path, slug: &str) -> Result<Self> {
        match Self::load(root, slug) {
            Ok(r) => Ok(r),
            Err(PlaybookError::ResponseNotFound(_)) => Ok(Self::new(slug)),
            Err(e) => Err(e),
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::response_path(root, &self.exercise);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // ---------------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------------

    fn ensure_editable(&self) -> Result<()> {
        if self.status == PersistedStatus::Completed {
            return Err(PlaybookError::ResponseCompleted(self.exercise.clone()));
        }
        Ok(())
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> Result<()> {
        self.ensure_editable()?;
        self.text = text.into();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Record a committed upload's storage key.
    pub fn attach(&mut self, kind: ModalityKind, key: impl Into<String>) -> Result<()> {
        self.ensure_editable()?;
        let keys = match kind {
            ModalityKind::Text => {
                return Err(PlaybookError::NotAttachable(kind.to_string()));
            }
            ModalityKind::Image => &mut self.image_keys,
            ModalityKind::Audio => &mut self.audio_keys,
            ModalityKind::Video => &mut self.video_keys,
            ModalityKind::Document => &mut self.document_keys,
        };
        keys.push(key.into());
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn keys(&self, kind: ModalityKind) -> &[String] {
        match kind {
            ModalityKind::Text => &[],
            ModalityKind::Image => &self.image_keys,
            ModalityKind::Audio => &self.audio_keys,
            ModalityKind::Video => &self.video_keys,
            ModalityKind::Document => &self.document_keys,
        }
    }

    // ---------------------------------------------------------------------------
    // Evaluation bridge
    // ---------------------------------------------------------------------------

    /// Committed facts only. A live editor merges queued uploads on top via
    /// `ResponseSnapshot::record_queued` before evaluating.
    pub fn snapshot(&self) -> ResponseSnapshot {
        let mut snap = ResponseSnapshot::new();
        snap.set_text(&self.text);
        for kind in ModalityKind::all() {
            if !self.keys(*kind).is_empty() {
                snap.record_committed(*kind);
            }
        }
        snap
    }

    pub fn progress(&self, requirements: &RequirementSet) -> ProgressReport {
        ProgressReport::compute(requirements, &self.snapshot(), Some(self.status))
    }

    // ---------------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------------

    /// The explicit save-as-completed transition. Refused while any
    /// requirement lacks committed content.
    pub fn complete(&mut self, requirements: &RequirementSet) -> Result<()> {
        let report = self.progress(requirements);
        if !report.can_complete {
            return Err(PlaybookError::RequirementsNotMet {
                exercise: self.exercise.clone(),
                missing: report.missing_labels.join(", "),
            });
        }
        self.status = PersistedStatus::Completed;
        self.completed_at = Some(Utc::now());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Revert to draft so the record becomes editable again.
    pub fn reopen(&mut self) {
        self.status = PersistedStatus::Draft;
        self.completed_at = None;
        self.updated_at = Utc::now();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
