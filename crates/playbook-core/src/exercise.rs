use crate::error::{PlaybookError, Result};
use crate::modality::ModalityKind;
use crate::paths;
use crate::requirement::{RawPolicy, RawRequirements, RequirementSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Exercise
// ---------------------------------------------------------------------------

/// A guided exercise template: prompt text plus the per-modality policy its
/// author chose. Immutable from the evaluator's point of view — editing the
/// template is an authoring concern, never something evaluation does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default)]
    pub requirements: RawRequirements,
    /// Soft character limit for the text response. Advisory only: the
    /// editor warns, completion gating ignores it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_char_limit: Option<usize>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub archived: bool,
}

impl Exercise {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            slug: slug.into(),
            title: title.into(),
            prompt: None,
            requirements: RawRequirements::default(),
            text_char_limit: None,
            created_at: now,
            updated_at: now,
            archived: false,
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    /// Create and save a new exercise. The stored policies are the
    /// canonical normalized form — in particular a single-member OR-group
    /// is persisted as a plain requirement, so malformed groups never enter
    /// the store through this path.
    pub fn create(
        root: &Path,
        slug: impl Into<String>,
        title: impl Into<String>,
        prompt: Option<String>,
        requirements: RawRequirements,
    ) -> Result<Self> {
        let slug = slug.into();
        paths::validate_slug(&slug)?;

        let dir = paths::exercise_dir(root, &slug);
        if dir.exists() {
            return Err(PlaybookError::ExerciseExists(slug));
        }

        let mut exercise = Self::new(slug, title);
        exercise.prompt = prompt;
        exercise.requirements = RequirementSet::normalize(&requirements).to_raw();
        exercise.save(root)?;
        Ok(exercise)
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        let manifest = paths::exercise_manifest(root, slug);
        if !manifest.exists() {
            return Err(PlaybookError::ExerciseNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&manifest)?;
        let exercise: Exercise = serde_yaml::from_str(&data)?;
        Ok(exercise)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let manifest = paths::exercise_manifest(root, &self.slug);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&manifest, data.as_bytes())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let exercises_dir = root.join(paths::EXERCISES_DIR);
        if !exercises_dir.exists() {
            return Ok(Vec::new());
        }

        let mut exercises = Vec::new();
        for entry in std::fs::read_dir(&exercises_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let slug = entry.file_name().to_string_lossy().into_owned();
                match Self::load(root, &slug) {
                    Ok(e) => exercises.push(e),
                    Err(PlaybookError::ExerciseNotFound(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        exercises.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(exercises)
    }

    // ---------------------------------------------------------------------------
    // Authoring
    // ---------------------------------------------------------------------------

    /// Change one modality's policy. Stored as the canonical enum shape;
    /// the OR-group singleton correction stays a read-side concern here so
    /// an author can tag members one at a time without surprises.
    pub fn set_policy(&mut self, kind: ModalityKind, policy: RawPolicy) {
        self.requirements
            .set(kind, RawPolicy::Policy(policy.normalized()));
        self.updated_at = Utc::now();
    }

    pub fn archive(&mut self) {
        self.archived = true;
        self.updated_at = Utc::now();
    }

    /// Normalized requirements for evaluation. Re-normalizes defensively:
    /// manifests that predate validation may still carry legacy booleans or
    /// a singleton OR-group.
    pub fn requirement_set(&self) -> RequirementSet {
        RequirementSet::normalize(&self.requirements)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
