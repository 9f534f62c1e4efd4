use crate::evaluate::{evaluate, SatisfactionSet};
use crate::modality::ModalityKind;
use crate::requirement::RequirementSet;
use crate::snapshot::{PersistedStatus, ResponseSnapshot};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ProgressState
// ---------------------------------------------------------------------------

/// Coarse lifecycle status shown to users and used for list filtering.
///
/// `Completed` is a fact about what was last persisted, not a live
/// computation — an exercise only reaches it through an explicit
/// save-as-completed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressState {
    Unstarted,
    Incomplete,
    Completed,
}

impl ProgressState {
    pub fn as_str(self) -> &'static str {
        match self {
            ProgressState::Unstarted => "unstarted",
            ProgressState::Incomplete => "incomplete",
            ProgressState::Completed => "completed",
        }
    }
}

impl fmt::Display for ProgressState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ProgressReport
// ---------------------------------------------------------------------------

/// Pure output of one progress evaluation, recomputed on every call and
/// discarded after use. Every call site — listings, the response form,
/// progress widgets — goes through the same computation, so they can never
/// disagree about an exercise's status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub state: ProgressState,
    pub total_requirements: u32,
    pub completed_requirements: u32,
    pub completed_labels: Vec<String>,
    pub missing_labels: Vec<String>,
    pub percentage_complete: u8,
    /// True iff every required modality has committed content and the
    /// OR-group (if any) has at least one committed member. Queued-but-not-
    /// uploaded content never counts here.
    pub can_complete: bool,
    /// Same value as `can_complete`; exposed separately for callers that
    /// split a "Save as Draft" vs "Complete" action on it.
    pub has_all_requirements: bool,
}

impl ProgressReport {
    /// Normalization is the caller's concern; this chains evaluate +
    /// aggregate so every call site takes identical inputs through one
    /// entry point.
    pub fn compute(
        requirements: &RequirementSet,
        snapshot: &ResponseSnapshot,
        status: Option<PersistedStatus>,
    ) -> Self {
        aggregate(requirements, &evaluate(requirements, snapshot), status)
    }
}

fn or_label(group: &[ModalityKind]) -> String {
    group
        .iter()
        .map(|k| k.label())
        .collect::<Vec<_>>()
        .join(" OR ")
}

fn percentage(completed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    // Round half-up; inputs are non-negative so f64 round does exactly that.
    ((100.0 * f64::from(completed)) / f64::from(total)).round() as u8
}

/// Reduce satisfaction facts into the progress report.
///
/// A persisted `Completed` status short-circuits to the fully-satisfied,
/// read-only report regardless of the live satisfaction facts: a transient
/// UI flicker must never downgrade a finished exercise. All other paths are
/// total — degenerate input degrades to `Unstarted` with `can_complete`
/// false rather than failing, because this runs on every keystroke.
pub fn aggregate(
    requirements: &RequirementSet,
    satisfaction: &SatisfactionSet,
    status: Option<PersistedStatus>,
) -> ProgressReport {
    let required = requirements.required();
    let or_group = requirements.or_group();

    let total = required.len() as u32 + u32::from(!or_group.is_empty());

    if status == Some(PersistedStatus::Completed) {
        let mut completed_labels: Vec<String> =
            required.iter().map(|k| k.label().to_string()).collect();
        if !or_group.is_empty() {
            completed_labels.push(or_label(&or_group));
        }
        return ProgressReport {
            state: ProgressState::Completed,
            total_requirements: total,
            completed_requirements: total,
            completed_labels,
            missing_labels: Vec::new(),
            percentage_complete: 100,
            can_complete: true,
            has_all_requirements: true,
        };
    }

    let mut completed: u32 = 0;
    let mut completed_labels: Vec<String> = Vec::new();
    let mut missing_labels: Vec<String> = Vec::new();
    let mut all_required_committed = true;

    for kind in &required {
        let sat = satisfaction.get(*kind);
        if sat.map(|s| s.counts_toward_progress()).unwrap_or(false) {
            completed += 1;
            completed_labels.push(kind.label().to_string());
        } else {
            missing_labels.push(kind.label().to_string());
        }
        if !sat.map(|s| s.is_committed()).unwrap_or(false) {
            all_required_committed = false;
        }
    }

    // The OR-group contributes at most one credit however many members are
    // satisfied.
    let mut or_committed = or_group.is_empty();
    if !or_group.is_empty() {
        let any_present = or_group.iter().any(|k| {
            satisfaction
                .get(*k)
                .map(|s| s.counts_toward_progress())
                .unwrap_or(false)
        });
        or_committed = or_group.iter().any(|k| {
            satisfaction
                .get(*k)
                .map(|s| s.is_committed())
                .unwrap_or(false)
        });
        if any_present {
            completed += 1;
            completed_labels.push(or_label(&or_group));
        } else {
            missing_labels.push(or_label(&or_group));
        }
    }

    let can_complete = total > 0 && all_required_committed && or_committed;
    let state = if completed == 0 {
        ProgressState::Unstarted
    } else {
        ProgressState::Incomplete
    };

    ProgressReport {
        state,
        total_requirements: total,
        completed_requirements: completed,
        completed_labels,
        missing_labels,
        percentage_complete: percentage(completed, total),
        can_complete,
        has_all_requirements: can_complete,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirement::{RawPolicy, RawRequirements, RequirementPolicy};

    fn requirements(pairs: &[(ModalityKind, RequirementPolicy)]) -> RequirementSet {
        let mut raw = RawRequirements::default();
        for (kind, policy) in pairs {
            raw.set(*kind, RawPolicy::Policy(*policy));
        }
        RequirementSet::normalize(&raw)
    }

    fn text_or_image_or_audio() -> RequirementSet {
        requirements(&[
            (ModalityKind::Text, RequirementPolicy::Required),
            (ModalityKind::Image, RequirementPolicy::Or),
            (ModalityKind::Audio, RequirementPolicy::Or),
        ])
    }

    #[test]
    fn identical_inputs_identical_reports() {
        let req = text_or_image_or_audio();
        let mut snap = ResponseSnapshot::new();
        snap.set_text("hello");
        snap.record_queued(ModalityKind::Image);

        let a = ProgressReport::compute(&req, &snap, Some(PersistedStatus::Draft));
        let b = ProgressReport::compute(&req, &snap, Some(PersistedStatus::Draft));
        assert_eq!(a, b);
    }

    #[test]
    fn completed_status_locks_the_report() {
        let req = text_or_image_or_audio();
        // Deliberately empty snapshot: the lock must hold anyway.
        let snap = ResponseSnapshot::new();

        let report = ProgressReport::compute(&req, &snap, Some(PersistedStatus::Completed));
        assert_eq!(report.state, ProgressState::Completed);
        assert!(report.can_complete);
        assert_eq!(report.percentage_complete, 100);
        assert_eq!(report.completed_requirements, report.total_requirements);
        assert!(report.missing_labels.is_empty());
        assert_eq!(report.completed_labels, vec!["Text", "Image OR Audio"]);
    }

    #[test]
    fn or_group_satisfied_by_one_member() {
        let req = requirements(&[
            (ModalityKind::Image, RequirementPolicy::Or),
            (ModalityKind::Audio, RequirementPolicy::Or),
        ]);
        let mut snap = ResponseSnapshot::new();
        snap.record_committed(ModalityKind::Audio);

        let report = ProgressReport::compute(&req, &snap, None);
        assert!(report.can_complete);
        assert_eq!(report.total_requirements, 1);
        assert_eq!(report.completed_requirements, 1);
        assert_eq!(report.percentage_complete, 100);
    }

    #[test]
    fn pending_counts_for_progress_not_completion() {
        let req = requirements(&[(ModalityKind::Video, RequirementPolicy::Required)]);
        let mut snap = ResponseSnapshot::new();
        snap.record_queued(ModalityKind::Video);

        let report = ProgressReport::compute(&req, &snap, None);
        assert!(!report.can_complete);
        assert!(report.percentage_complete > 0);
        assert_eq!(report.state, ProgressState::Incomplete);
        assert_eq!(report.completed_labels, vec!["Video"]);
    }

    #[test]
    fn adding_content_never_decreases_progress() {
        let req = requirements(&[
            (ModalityKind::Text, RequirementPolicy::Required),
            (ModalityKind::Image, RequirementPolicy::Required),
            (ModalityKind::Audio, RequirementPolicy::Or),
            (ModalityKind::Video, RequirementPolicy::Or),
        ]);

        let mut snap = ResponseSnapshot::new();
        let mut last = ProgressReport::compute(&req, &snap, None);
        let additions = [
            ModalityKind::Image,
            ModalityKind::Audio,
            ModalityKind::Video,
        ];
        for kind in additions {
            snap.record_committed(kind);
            let next = ProgressReport::compute(&req, &snap, None);
            assert!(next.percentage_complete >= last.percentage_complete);
            assert!(next.completed_requirements >= last.completed_requirements);
            last = next;
        }
    }

    #[test]
    fn vacuous_exercise_is_unstarted_and_uncompletable() {
        let req = RequirementSet::normalize(&RawRequirements::default());
        let mut snap = ResponseSnapshot::new();
        snap.set_text("content nobody asked for");

        let report = ProgressReport::compute(&req, &snap, None);
        assert_eq!(report.state, ProgressState::Unstarted);
        assert!(!report.can_complete);
        assert_eq!(report.total_requirements, 0);
        assert_eq!(report.percentage_complete, 0);
    }

    #[test]
    fn draft_with_everything_satisfied_is_still_incomplete() {
        let req = text_or_image_or_audio();
        let mut snap = ResponseSnapshot::new();
        snap.set_text("hello");
        snap.record_committed(ModalityKind::Audio);

        let report = ProgressReport::compute(&req, &snap, Some(PersistedStatus::Draft));
        assert_eq!(report.total_requirements, 2);
        assert_eq!(report.completed_requirements, 2);
        assert_eq!(report.percentage_complete, 100);
        assert!(report.can_complete);
        assert!(report.has_all_requirements);
        assert!(report.missing_labels.is_empty());
        // Satisfying requirements is a permission, not a state transition.
        assert_eq!(report.state, ProgressState::Incomplete);
    }

    #[test]
    fn empty_snapshot_lists_everything_missing() {
        let req = text_or_image_or_audio();
        let mut snap = ResponseSnapshot::new();
        snap.set_text("");

        let report = ProgressReport::compute(&req, &snap, Some(PersistedStatus::Draft));
        assert_eq!(report.completed_requirements, 0);
        assert_eq!(report.percentage_complete, 0);
        assert_eq!(report.state, ProgressState::Unstarted);
        assert_eq!(report.missing_labels, vec!["Text", "Image OR Audio"]);
    }

    #[test]
    fn three_member_or_group_single_credit() {
        let req = requirements(&[
            (ModalityKind::Image, RequirementPolicy::Or),
            (ModalityKind::Audio, RequirementPolicy::Or),
            (ModalityKind::Document, RequirementPolicy::Or),
        ]);
        let mut snap = ResponseSnapshot::new();
        snap.record_committed(ModalityKind::Document);

        let report = ProgressReport::compute(&req, &snap, None);
        assert_eq!(report.completed_requirements, 1);
        assert!(report.missing_labels.is_empty());
        assert_eq!(report.completed_labels, vec!["Image OR Audio OR Document"]);

        // Satisfying a second member adds no extra credit.
        snap.record_committed(ModalityKind::Image);
        let report = ProgressReport::compute(&req, &snap, None);
        assert_eq!(report.completed_requirements, 1);
    }

    #[test]
    fn or_group_pending_member_counts_toward_progress_only() {
        let req = requirements(&[
            (ModalityKind::Text, RequirementPolicy::Required),
            (ModalityKind::Image, RequirementPolicy::Or),
            (ModalityKind::Audio, RequirementPolicy::Or),
        ]);
        let mut snap = ResponseSnapshot::new();
        snap.set_text("hello");
        snap.record_queued(ModalityKind::Image);

        let report = ProgressReport::compute(&req, &snap, None);
        assert_eq!(report.completed_requirements, 2);
        assert_eq!(report.percentage_complete, 100);
        assert!(!report.can_complete);
    }

    #[test]
    fn report_json_roundtrip() {
        let req = text_or_image_or_audio();
        let mut snap = ResponseSnapshot::new();
        snap.set_text("hello");

        let report = ProgressReport::compute(&req, &snap, Some(PersistedStatus::Draft));
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"state\":\"incomplete\""));
        let parsed: ProgressReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn percentage_rounds_half_up() {
        // One of three requirements: 33.33 rounds to 33.
        assert_eq!(percentage(1, 3), 33);
        // Two of three: 66.67 rounds to 67.
        assert_eq!(percentage(2, 3), 67);
        // Half exactly: 50.
        assert_eq!(percentage(1, 2), 50);
        // 62.5 rounds up to 63.
        assert_eq!(percentage(5, 8), 63);
        assert_eq!(percentage(0, 0), 0);
    }
}
