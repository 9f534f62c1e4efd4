use crate::error::{PlaybookError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const PLAYBOOK_DIR: &str = ".playbook";
pub const EXERCISES_DIR: &str = ".playbook/exercises";
pub const RESPONSES_DIR: &str = ".playbook/responses";

pub const MANIFEST_FILE: &str = "manifest.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn playbook_dir(root: &Path) -> PathBuf {
    root.join(PLAYBOOK_DIR)
}

/// Refuse to operate on a root that was never initialized, so a mistyped
/// `--root` cannot silently grow a fresh `.playbook/` tree.
pub fn ensure_initialized(root: &Path) -> Result<()> {
    if !playbook_dir(root).is_dir() {
        return Err(PlaybookError::NotInitialized);
    }
    Ok(())
}

pub fn exercise_dir(root: &Path, slug: &str) -> PathBuf {
    root.join(EXERCISES_DIR).join(slug)
}

pub fn exercise_manifest(root: &Path, slug: &str) -> PathBuf {
    exercise_dir(root, slug).join(MANIFEST_FILE)
}

pub fn response_path(root: &Path, slug: &str) -> PathBuf {
    root.join(RESPONSES_DIR).join(format!("{slug}.yaml"))
}

// ---------------------------------------------------------------------------
// Slug validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(PlaybookError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
