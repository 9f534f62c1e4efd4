use crate::modality::ModalityKind;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// RequirementPolicy
// ---------------------------------------------------------------------------

/// What an exercise asks of one modality.
///
/// `Or` marks the modality as a member of the exercise's single OR-group:
/// satisfying any one OR-tagged modality satisfies the whole group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequirementPolicy {
    #[default]
    NotRequired,
    Required,
    Or,
}

impl RequirementPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            RequirementPolicy::NotRequired => "not_required",
            RequirementPolicy::Required => "required",
            RequirementPolicy::Or => "or",
        }
    }
}

impl fmt::Display for RequirementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequirementPolicy {
    type Err = crate::error::PlaybookError;

    /// Accepts the canonical names plus the legacy boolean spellings still
    /// found in old exercise manifests.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "required" | "true" => Ok(RequirementPolicy::Required),
            "not_required" | "not-required" | "false" => Ok(RequirementPolicy::NotRequired),
            "or" => Ok(RequirementPolicy::Or),
            _ => Err(crate::error::PlaybookError::InvalidPolicy(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// RawPolicy — boundary shape
// ---------------------------------------------------------------------------

/// Boundary representation of one modality's policy. Legacy exercises store
/// plain booleans; newer ones store the three-state enum. Callers never
/// branch on which shape they got — `normalized()` collapses both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPolicy {
    Legacy(bool),
    Policy(RequirementPolicy),
}

impl Default for RawPolicy {
    fn default() -> Self {
        RawPolicy::Policy(RequirementPolicy::NotRequired)
    }
}

impl RawPolicy {
    pub fn normalized(self) -> RequirementPolicy {
        match self {
            RawPolicy::Legacy(true) => RequirementPolicy::Required,
            RawPolicy::Legacy(false) => RequirementPolicy::NotRequired,
            RawPolicy::Policy(p) => p,
        }
    }
}

impl From<RequirementPolicy> for RawPolicy {
    fn from(p: RequirementPolicy) -> Self {
        RawPolicy::Policy(p)
    }
}

// ---------------------------------------------------------------------------
// RawRequirements
// ---------------------------------------------------------------------------

/// Per-modality policies as stored in an exercise manifest. Absent fields
/// default to not-required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRequirements {
    #[serde(default)]
    pub text: RawPolicy,
    #[serde(default)]
    pub image: RawPolicy,
    #[serde(default)]
    pub audio: RawPolicy,
    #[serde(default)]
    pub video: RawPolicy,
    #[serde(default)]
    pub document: RawPolicy,
}

impl RawRequirements {
    pub fn get(&self, kind: ModalityKind) -> RawPolicy {
        match kind {
            ModalityKind::Text => self.text,
            ModalityKind::Image => self.image,
            ModalityKind::Audio => self.audio,
            ModalityKind::Video => self.video,
            ModalityKind::Document => self.document,
        }
    }

    pub fn set(&mut self, kind: ModalityKind, policy: RawPolicy) {
        match kind {
            ModalityKind::Text => self.text = policy,
            ModalityKind::Image => self.image = policy,
            ModalityKind::Audio => self.audio = policy,
            ModalityKind::Video => self.video = policy,
            ModalityKind::Document => self.document = policy,
        }
    }
}

// ---------------------------------------------------------------------------
// RequirementSet
// ---------------------------------------------------------------------------

/// The normalized policies for one exercise, one per modality in canonical
/// order. Produced once per evaluation by [`RequirementSet::normalize`];
/// downstream code never sees the raw boundary shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct RequirementSet {
    policies: [RequirementPolicy; 5],
}

impl RequirementSet {
    /// Collapse the boundary shapes into canonical policies and apply the
    /// OR-group singleton correction: a single-choice "or" is not a choice,
    /// so an OR-group of exactly one member becomes a plain requirement.
    /// Malformed data degrades, it never errors.
    pub fn normalize(raw: &RawRequirements) -> Self {
        let mut policies = [RequirementPolicy::NotRequired; 5];
        for kind in ModalityKind::all() {
            policies[kind.index()] = raw.get(*kind).normalized();
        }

        let or_members: Vec<usize> = policies
            .iter()
            .enumerate()
            .filter(|(_, p)| **p == RequirementPolicy::Or)
            .map(|(i, _)| i)
            .collect();
        if or_members.len() == 1 {
            policies[or_members[0]] = RequirementPolicy::Required;
        }

        Self { policies }
    }

    pub fn policy(&self, kind: ModalityKind) -> RequirementPolicy {
        self.policies[kind.index()]
    }

    /// Modalities individually required, canonical order.
    pub fn required(&self) -> Vec<ModalityKind> {
        ModalityKind::all()
            .iter()
            .copied()
            .filter(|k| self.policy(*k) == RequirementPolicy::Required)
            .collect()
    }

    /// The OR-group: size 0 or >= 2 after normalization.
    pub fn or_group(&self) -> Vec<ModalityKind> {
        ModalityKind::all()
            .iter()
            .copied()
            .filter(|k| self.policy(*k) == RequirementPolicy::Or)
            .collect()
    }

    /// True when no modality is required at all.
    pub fn is_empty(&self) -> bool {
        self.policies
            .iter()
            .all(|p| *p == RequirementPolicy::NotRequired)
    }

    /// Canonical boundary shape, used to persist normalized policies back
    /// into an exercise manifest at authoring time.
    pub fn to_raw(&self) -> RawRequirements {
        let mut raw = RawRequirements::default();
        for kind in ModalityKind::all() {
            raw.set(*kind, RawPolicy::Policy(self.policy(*kind)));
        }
        raw
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(ModalityKind, RawPolicy)]) -> RawRequirements {
        let mut r = RawRequirements::default();
        for (kind, policy) in pairs {
            r.set(*kind, *policy);
        }
        r
    }

    #[test]
    fn legacy_booleans_normalize() {
        let r = raw(&[
            (ModalityKind::Text, RawPolicy::Legacy(true)),
            (ModalityKind::Image, RawPolicy::Legacy(false)),
        ]);
        let set = RequirementSet::normalize(&r);
        assert_eq!(set.policy(ModalityKind::Text), RequirementPolicy::Required);
        assert_eq!(
            set.policy(ModalityKind::Image),
            RequirementPolicy::NotRequired
        );
        assert_eq!(
            set.policy(ModalityKind::Audio),
            RequirementPolicy::NotRequired
        );
    }

    #[test]
    fn absent_fields_default_to_not_required() {
        let yaml = "text: required\n";
        let r: RawRequirements = serde_yaml::from_str(yaml).unwrap();
        let set = RequirementSet::normalize(&r);
        assert_eq!(set.policy(ModalityKind::Text), RequirementPolicy::Required);
        assert!(set.or_group().is_empty());
        assert_eq!(set.required(), vec![ModalityKind::Text]);
    }

    #[test]
    fn mixed_legacy_and_enum_yaml() {
        let yaml = "text: true\nimage: or\naudio: or\nvideo: false\n";
        let r: RawRequirements = serde_yaml::from_str(yaml).unwrap();
        let set = RequirementSet::normalize(&r);
        assert_eq!(set.policy(ModalityKind::Text), RequirementPolicy::Required);
        assert_eq!(
            set.or_group(),
            vec![ModalityKind::Image, ModalityKind::Audio]
        );
    }

    #[test]
    fn singleton_or_group_becomes_required() {
        let r = raw(&[(ModalityKind::Video, RawPolicy::Policy(RequirementPolicy::Or))]);
        let set = RequirementSet::normalize(&r);
        assert_eq!(set.policy(ModalityKind::Video), RequirementPolicy::Required);
        assert!(set.or_group().is_empty());
    }

    #[test]
    fn or_group_of_two_survives() {
        let r = raw(&[
            (ModalityKind::Image, RawPolicy::Policy(RequirementPolicy::Or)),
            (ModalityKind::Audio, RawPolicy::Policy(RequirementPolicy::Or)),
        ]);
        let set = RequirementSet::normalize(&r);
        assert_eq!(
            set.or_group(),
            vec![ModalityKind::Image, ModalityKind::Audio]
        );
        assert!(set.required().is_empty());
    }

    #[test]
    fn empty_set() {
        let set = RequirementSet::normalize(&RawRequirements::default());
        assert!(set.is_empty());
        assert!(set.required().is_empty());
        assert!(set.or_group().is_empty());
    }

    #[test]
    fn to_raw_is_canonical() {
        let r = raw(&[(ModalityKind::Text, RawPolicy::Legacy(true))]);
        let set = RequirementSet::normalize(&r);
        let canonical = set.to_raw();
        assert_eq!(
            canonical.get(ModalityKind::Text),
            RawPolicy::Policy(RequirementPolicy::Required)
        );
        // Round-trips through normalize unchanged.
        assert_eq!(RequirementSet::normalize(&canonical), set);
    }

    #[test]
    fn policy_from_str() {
        use std::str::FromStr;
        assert_eq!(
            RequirementPolicy::from_str("or").unwrap(),
            RequirementPolicy::Or
        );
        assert_eq!(
            RequirementPolicy::from_str("true").unwrap(),
            RequirementPolicy::Required
        );
        assert_eq!(
            RequirementPolicy::from_str("not-required").unwrap(),
            RequirementPolicy::NotRequired
        );
        assert!(RequirementPolicy::from_str("maybe").is_err());
    }
}
