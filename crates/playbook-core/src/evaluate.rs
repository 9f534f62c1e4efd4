use crate::modality::ModalityKind;
use crate::requirement::{RequirementPolicy, RequirementSet};
use crate::snapshot::{Evidence, ResponseSnapshot};

// ---------------------------------------------------------------------------
// Satisfaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Satisfaction {
    Committed,
    Pending,
    Unsatisfied,
}

impl Satisfaction {
    /// Committed-or-pending: counts toward the progress display.
    pub fn counts_toward_progress(self) -> bool {
        !matches!(self, Satisfaction::Unsatisfied)
    }

    /// Committed-only: counts toward completion eligibility.
    pub fn is_committed(self) -> bool {
        matches!(self, Satisfaction::Committed)
    }
}

impl From<Evidence> for Satisfaction {
    fn from(e: Evidence) -> Self {
        match e {
            Evidence::Committed => Satisfaction::Committed,
            Evidence::Pending => Satisfaction::Pending,
            Evidence::Missing => Satisfaction::Unsatisfied,
        }
    }
}

// ---------------------------------------------------------------------------
// SatisfactionSet
// ---------------------------------------------------------------------------

/// Per-modality satisfaction facts. `None` marks modalities the exercise
/// does not ask for. Iteration always follows canonical modality order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SatisfactionSet {
    entries: [Option<Satisfaction>; 5],
}

impl SatisfactionSet {
    pub fn get(&self, kind: ModalityKind) -> Option<Satisfaction> {
        self.entries[kind.index()]
    }
}

/// Inspect a snapshot against the normalized requirements. Total over the
/// requested modalities, pure, and order-independent: the result depends
/// only on the inputs.
pub fn evaluate(requirements: &RequirementSet, snapshot: &ResponseSnapshot) -> SatisfactionSet {
    let mut set = SatisfactionSet::default();
    for kind in ModalityKind::all() {
        if requirements.policy(*kind) == RequirementPolicy::NotRequired {
            continue;
        }
        set.entries[kind.index()] = Some(Satisfaction::from(snapshot.evidence(*kind)));
    }
    set
}

/// Authoring-time soft limit check. Exceeding the limit warns in the editor
/// but never blocks completion.
pub fn text_over_limit(text: &str, limit: Option<usize>) -> bool {
    match limit {
        Some(max) => text.trim().chars().count() > max,
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
