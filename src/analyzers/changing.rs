//! Changing lines from Interface to Safe Mode: which positions must move
//! for the person to drop into their defensive stance, and how hard that is.

use super::types::{DiagnosticRecord, Findings};
use super::{AnalysisContext, AnalysisMethod, Analyzer, manifestations};
use crate::error::Result;
use crate::knowledge::HexagramId;
use crate::profile::ProfileRole;
use crate::transform::{self, LINE_COUNT};
use serde::Serialize;

pub struct ChangingHexagram;

const TRIGGERS: [&str; LINE_COUNT] = [
    "a small setback at the foundation",
    "friction with a close collaborator",
    "pressure at a point of transition",
    "conflicting demands from above",
    "a challenge to one's authority",
    "exhaustion after overreaching",
];

const SIGNS: [&str; LINE_COUNT] = [
    "routine habits start to slip",
    "cooperation turns guarded",
    "decisions are postponed",
    "loyalties feel divided",
    "control is asserted more sharply",
    "withdrawal from the wider situation",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    None,
    Easy,
    Moderate,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stability {
    Stable,
    Flexible,
    Volatile,
    Unstable,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangingFindings {
    pub from: ProfileRole,
    pub to: ProfileRole,
    pub changed_positions: Vec<usize>,
    pub difficulty: Difficulty,
    pub stability: Stability,
    pub triggers: Vec<&'static str>,
    /// Hexagrams passed through when the lines change one at a time, bottom first.
    pub path: Vec<HexagramId>,
}

pub fn classify(changed: usize) -> (Difficulty, Stability) {
    match changed {
        0 => (Difficulty::None, Stability::Stable),
        1..=2 => (Difficulty::Easy, Stability::Flexible),
        3..=4 => (Difficulty::Moderate, Stability::Volatile),
        _ => (Difficulty::Hard, Stability::Unstable),
    }
}

impl Analyzer for ChangingHexagram {
    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::ChangingHexagram
    }

    fn analyze(&self, ctx: &AnalysisContext) -> Result<DiagnosticRecord> {
        let from = ctx.hexagram(ProfileRole::Interface);
        let to = ctx.hexagram(ProfileRole::SafeMode);
        let changed_positions = transform::line_diff(&from.lines, &to.lines);
        let (difficulty, stability) = classify(changed_positions.len());

        let mut path = vec![from.id];
        let mut current = from.lines;
        for &pos in &changed_positions {
            current = transform::changing(&current, &[pos]);
            path.push(ctx.kb().resolve(&current));
        }

        let triggers: Vec<&'static str> = changed_positions
            .iter()
            .map(|p| TRIGGERS[p - 1])
            .collect();

        let diagnosis = match difficulty {
            Difficulty::None => {
                "Interface and Safe Mode coincide; there is no separate defensive stance to switch into."
                    .to_string()
            }
            Difficulty::Easy => format!(
                "Safe Mode is {} line(s) away from the Interface: an easy, flexible shift.",
                changed_positions.len()
            ),
            Difficulty::Moderate => format!(
                "Safe Mode is {} lines away from the Interface: a noticeable, somewhat volatile shift.",
                changed_positions.len()
            ),
            Difficulty::Hard => format!(
                "Safe Mode is {} lines away from the Interface: switching is hard and leaves the person unsettled.",
                changed_positions.len()
            ),
        };

        let mut items = vec![
            format!("Interface #{} → Safe Mode #{}", from.id, to.id),
            match triggers.first() {
                Some(t) => format!("Typically set off by {t}"),
                None => "Stress does not change the outward stance".to_string(),
            },
        ];
        items.extend(
            changed_positions
                .iter()
                .take(2)
                .map(|p| format!("Early sign: {}", SIGNS[p - 1])),
        );

        Ok(DiagnosticRecord::computed(
            self.method(),
            Findings::Changing(ChangingFindings {
                from: ProfileRole::Interface,
                to: ProfileRole::SafeMode,
                changed_positions,
                difficulty,
                stability,
                triggers,
                path,
            }),
            diagnosis,
            manifestations(items),
        ))
    }
}
