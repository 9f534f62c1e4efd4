use crate::progress::ProgressState;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ColorToken
// ---------------------------------------------------------------------------

/// Discrete theme color for the state badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorToken {
    Neutral,
    Warning,
    Success,
}

// ---------------------------------------------------------------------------
// StateBadge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateBadge {
    pub icon: &'static str,
    pub label: &'static str,
    pub color: ColorToken,
}

/// Badge lookup for a lifecycle state. Pure table.
pub fn badge(state: ProgressState) -> StateBadge {
    match state {
        ProgressState::Unstarted => StateBadge {
            icon: "🔓",
            label: "Unstarted",
            color: ColorToken::Neutral,
        },
        ProgressState::Incomplete => StateBadge {
            icon: "🚀",
            label: "Started",
            color: ColorToken::Warning,
        },
        ProgressState::Completed => StateBadge {
            icon: "✅",
            label: "Completed",
            color: ColorToken::Success,
        },
    }
}

/// Continuous red→amber→green fill color for the progress bar. Independent
/// of the discrete badge color: a bar at 40% is amber even while the badge
/// still says "Started".
pub fn percentage_color(percentage: u8) -> String {
    let pct = u32::from(percentage.min(100));
    // Hue 0 (red) through 120 (green).
    let hue = pct * 120 / 100;
    format!("hsl({hue}, 70%, 45%)")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
