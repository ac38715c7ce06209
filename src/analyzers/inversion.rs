//! Internal/external inversion: outward trigrams (heaven, lake, fire,
//! thunder) against inward ones (wind, water, mountain, earth), slot by slot.

use super::types::{DiagnosticRecord, Findings, Severity};
use super::{AnalysisContext, AnalysisMethod, Analyzer, PAIRS, ROLES, manifestations};
use crate::error::Result;
use crate::knowledge::Orientation;
use crate::profile::ProfileRole;
use serde::Serialize;

pub struct InternalExternalInversion;

/// Orientation of one profile across both of its trigrams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outward,
    Inward,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InversionKind {
    None,
    OnePair,
    FullReversal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairInversion {
    pub from: ProfileRole,
    pub to: ProfileRole,
    pub kind: InversionKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InversionFindings {
    pub directions: [Direction; 3],
    pub pairs: Vec<PairInversion>,
    pub patterns: Vec<String>,
    pub severity: Severity,
    pub energy_flow: String,
}

impl InversionFindings {
    pub fn pair(&self, from: ProfileRole, to: ProfileRole) -> Option<InversionKind> {
        self.pairs
            .iter()
            .find(|p| p.from == from && p.to == to)
            .map(|p| p.kind)
    }
}

fn direction(upper: Orientation, lower: Orientation) -> Direction {
    match (upper, lower) {
        (Orientation::Outward, Orientation::Outward) => Direction::Outward,
        (Orientation::Inward, Orientation::Inward) => Direction::Inward,
        _ => Direction::Mixed,
    }
}

impl Analyzer for InternalExternalInversion {
    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::InternalExternalInversion
    }

    fn analyze(&self, ctx: &AnalysisContext) -> Result<DiagnosticRecord> {
        let slots = |role: ProfileRole| {
            [
                ctx.upper(role).orientation(),
                ctx.lower(role).orientation(),
            ]
        };
        let directions = ROLES.map(|r| {
            let [u, l] = slots(r);
            direction(u, l)
        });

        let pairs: Vec<PairInversion> = PAIRS
            .iter()
            .map(|&(from, to)| {
                let a = slots(from);
                let b = slots(to);
                let differing = a.iter().zip(b.iter()).filter(|(x, y)| x != y).count();
                let kind = match differing {
                    0 => InversionKind::None,
                    1 => InversionKind::OnePair,
                    _ => InversionKind::FullReversal,
                };
                PairInversion { from, to, kind }
            })
            .collect();

        let patterns: Vec<String> = pairs
            .iter()
            .filter_map(|p| match p.kind {
                InversionKind::None => None,
                InversionKind::OnePair => {
                    Some(format!("{} and {} differ in one trigram slot", p.from, p.to))
                }
                InversionKind::FullReversal => Some(format!(
                    "{} and {} are fully reversed inside and out",
                    p.from, p.to
                )),
            })
            .collect();

        let severity = if pairs.iter().any(|p| p.kind == InversionKind::FullReversal) {
            Severity::High
        } else if pairs.iter().any(|p| p.kind == InversionKind::OnePair) {
            Severity::Medium
        } else {
            Severity::Low
        };

        let energy_flow = match (directions[0], directions[1]) {
            (Direction::Inward, Direction::Outward) => {
                "Inner energy is pushed outward: a reserved core behind an expressive surface"
            }
            (Direction::Outward, Direction::Inward) => {
                "Outer drive is held back: a forceful core behind a quiet surface"
            }
            (a, b) if a == b => "Core and surface move in the same direction",
            _ => "Energy moves unevenly between core and surface",
        }
        .to_string();

        let diagnosis = match severity {
            Severity::High => {
                "A full inside-out reversal separates at least two profiles; what drives the person is not what others see."
            }
            Severity::Medium => {
                "The profiles are partially inverted; one layer faces the world while another stays inward."
            }
            Severity::Low => "Inner and outer orientation are consistent across all three profiles.",
        };

        let mut items = vec![
            format!(
                "Engine {:?}, Interface {:?}, Safe Mode {:?}",
                directions[0], directions[1], directions[2]
            ),
            energy_flow.clone(),
        ];
        items.extend(patterns.iter().cloned());

        Ok(DiagnosticRecord::computed(
            self.method(),
            Findings::Inversion(InversionFindings {
                directions,
                pairs,
                patterns,
                severity,
                energy_flow,
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

    fn findings(e: u32, i: u32, s: u32) -> InversionFindings {
        InternalExternalInversion
            .analyze(&ctx(e, i, s))
            .unwrap()
            .inversion()
            .cloned()
            .unwrap()
    }

    #[test]
    fn heaven_against_earth_is_a_full_reversal() {
        let f = findings(1, 2, 11);
        assert_eq!(
            f.pair(ProfileRole::Engine, ProfileRole::Interface),
            Some(InversionKind::FullReversal)
        );
        assert_eq!(
            f.pair(ProfileRole::Engine, ProfileRole::SafeMode),
            Some(InversionKind::OnePair)
        );
        assert_eq!(f.severity, Severity::High);
        assert_eq!(f.directions, [Direction::Outward, Direction::Inward, Direction::Mixed]);
    }

    #[test]
    fn identical_profiles_have_no_inversion() {
        let f = findings(30, 30, 30);
        assert!(f.patterns.is_empty());
        assert_eq!(f.severity, Severity::Low);
    }
}
