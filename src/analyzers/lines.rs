//! Line-by-line correspondence. Positions 2 (minister) and 5 (ruler) carry
//! the relationship; a split there is a role conflict.

use super::types::{DiagnosticRecord, Findings, Severity};
use super::{AnalysisContext, AnalysisMethod, Analyzer, ROLES, manifestations, round3};
use crate::error::Result;
use crate::profile::ProfileRole;
use crate::transform::LINE_COUNT;
use serde::Serialize;

pub struct LineCorrespondence;

const POSITION_NAMES: [&str; LINE_COUNT] = [
    "foundation",
    "minister",
    "threshold",
    "counselor",
    "ruler",
    "sage",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictKind {
    RoleConflict,
    PolarityMismatch,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineConflict {
    pub position: usize,
    pub name: &'static str,
    pub kind: ConflictKind,
    pub severity: Severity,
    /// The profile whose line differs from the other two.
    pub outlier: ProfileRole,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineFindings {
    pub agreement_ratio: f64,
    pub agreeing_positions: Vec<usize>,
    pub conflicts: Vec<LineConflict>,
}

impl LineFindings {
    pub fn has_high_severity(&self) -> bool {
        self.conflicts.iter().any(|c| c.severity == Severity::High)
    }
}

impl Analyzer for LineCorrespondence {
    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::LineCorrespondence
    }

    fn analyze(&self, ctx: &AnalysisContext) -> Result<DiagnosticRecord> {
        let lines = ROLES.map(|r| ctx.hexagram(r).lines);
        let mut agreeing_positions = Vec::new();
        let mut conflicts = Vec::new();

        for pos in 1..=LINE_COUNT {
            let vals = lines.map(|l| l.at(pos).unwrap_or_default());
            if vals[0] == vals[1] && vals[1] == vals[2] {
                agreeing_positions.push(pos);
                continue;
            }
            // three binary values, not all equal: exactly one is the odd one out
            let outlier = if vals[1] == vals[2] {
                ProfileRole::Engine
            } else if vals[0] == vals[2] {
                ProfileRole::Interface
            } else {
                ProfileRole::SafeMode
            };
            let (kind, severity) = if pos == 2 || pos == 5 {
                (ConflictKind::RoleConflict, Severity::High)
            } else {
                (ConflictKind::PolarityMismatch, Severity::Medium)
            };
            conflicts.push(LineConflict {
                position: pos,
                name: POSITION_NAMES[pos - 1],
                kind,
                severity,
                outlier,
            });
        }

        let agreement_ratio = agreeing_positions.len() as f64 / LINE_COUNT as f64;
        let role_conflicts: Vec<&LineConflict> = conflicts
            .iter()
            .filter(|c| c.kind == ConflictKind::RoleConflict)
            .collect();

        let diagnosis = if conflicts.is_empty() {
            "All six positions correspond; the profiles act from the same stance at every level."
                .to_string()
        } else if !role_conflicts.is_empty() {
            let names: Vec<&str> = role_conflicts.iter().map(|c| c.name).collect();
            format!(
                "Role conflict at the {} position(s): authority and support are not shared.",
                names.join(" and ")
            )
        } else {
            format!(
                "{} position(s) disagree, none of them at the ruler or minister lines.",
                conflicts.len()
            )
        };

        let mut items = vec![
            format!("{} of 6 positions agree", agreeing_positions.len()),
            if agreement_ratio >= 0.5 {
                "Reactions stay recognisable across contexts".to_string()
            } else {
                "Reactions change character from one context to the next".to_string()
            },
        ];
        for c in conflicts.iter().take(2) {
            items.push(format!(
                "{} breaks ranks at the {} line ({})",
                c.outlier, c.name, c.position
            ));
        }

        Ok(DiagnosticRecord::computed(
            self.method(),
            Findings::Lines(LineFindings {
                agreement_ratio: round3(agreement_ratio),
                agreeing_positions,
                conflicts,
            }),
            diagnosis,
            manifestations(items),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::ctx;

    #[test]
    fn ruler_and_minister_splits_are_high_severity() {
        // heaven, earth, peace: positions 1-3 split 1/0/1, 4-6 split 1/0/0
        let record = LineCorrespondence.analyze(&ctx(1, 2, 11)).unwrap();
        let f = record.lines().unwrap();
        assert_eq!(f.conflicts.len(), 6);
        let minister = &f.conflicts[1];
        assert_eq!(minister.kind, ConflictKind::RoleConflict);
        assert_eq!(minister.severity, Severity::High);
        assert_eq!(minister.outlier, ProfileRole::Interface);
        let ruler = &f.conflicts[4];
        assert_eq!(ruler.outlier, ProfileRole::Engine);
        assert!(f.has_high_severity());
    }

    #[test]
    fn identical_lines_fully_agree() {
        let record = LineCorrespondence.analyze(&ctx(29, 29, 29)).unwrap();
        let f = record.lines().unwrap();
        assert!(f.conflicts.is_empty());
        assert_eq!(f.agreement_ratio, 1.0);
    }
}
