//! Inverted (all lines changed) hexagrams: when one profile is the exact
//! opposite of another, that opposition is a risk.

use super::types::{DiagnosticRecord, Findings, Severity};
use super::{AnalysisContext, AnalysisMethod, Analyzer, ROLES, manifestations};
use crate::error::Result;
use crate::knowledge::HexagramId;
use crate::profile::ProfileRole;
use crate::transform;
use serde::Serialize;

pub struct InvertedHexagram;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InversionRisk {
    pub source: ProfileRole,
    pub target: ProfileRole,
    pub level: Severity,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvertedFindings {
    pub inverted_ids: [HexagramId; 3],
    pub shadow_themes: [&'static str; 3],
    pub risks: Vec<InversionRisk>,
}

/// (source, target, level, description), checked in this order.
const RULES: [(ProfileRole, ProfileRole, Severity, &str); 3] = [
    (
        ProfileRole::Engine,
        ProfileRole::Interface,
        Severity::Medium,
        "the public face works against the inner drive",
    ),
    (
        ProfileRole::Engine,
        ProfileRole::SafeMode,
        Severity::High,
        "under stress the person turns into the opposite of their core",
    ),
    (
        ProfileRole::Interface,
        ProfileRole::SafeMode,
        Severity::High,
        "the defensive response undoes the social role",
    ),
];

impl Analyzer for InvertedHexagram {
    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::InvertedHexagram
    }

    fn analyze(&self, ctx: &AnalysisContext) -> Result<DiagnosticRecord> {
        let kb = ctx.kb();
        let inverted = ROLES.map(|r| kb.resolve_hexagram(&transform::inverted(&ctx.hexagram(r).lines)));
        let inverted_ids = inverted.map(|h| h.id);
        let shadow_themes = inverted.map(|h| h.theme);

        let index = |role: ProfileRole| match role {
            ProfileRole::Engine => 0,
            ProfileRole::Interface => 1,
            ProfileRole::SafeMode => 2,
        };
        let risks: Vec<InversionRisk> = RULES
            .iter()
            .filter(|(source, target, _, _)| inverted_ids[index(*source)] == ctx.hexagram(*target).id)
            .map(|&(source, target, level, description)| InversionRisk {
                source,
                target,
                level,
                description,
            })
            .collect();

        let diagnosis = match risks.iter().map(|r| r.level).max() {
            Some(Severity::High) => format!(
                "High inversion risk: {}.",
                risks
                    .iter()
                    .filter(|r| r.level == Severity::High)
                    .map(|r| r.description)
                    .collect::<Vec<_>>()
                    .join("; ")
            ),
            Some(_) => format!("Moderate inversion risk: {}.", risks[0].description),
            None => format!(
                "No profile is the exact opposite of another; the Engine's shadow (\"{}\") stays latent.",
                shadow_themes[0]
            ),
        };

        let mut items = vec![
            format!("Engine shadow: \"{}\"", shadow_themes[0]),
            format!("Interface shadow: \"{}\"", shadow_themes[1]),
        ];
        items.extend(
            risks
                .iter()
                .map(|r| format!("{} mirrors the opposite of {}", r.target, r.source)),
        );

        Ok(DiagnosticRecord::computed(
            self.method(),
            Findings::Inverted(InvertedFindings {
                inverted_ids,
                shadow_themes,
                risks,
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

    fn risks(e: u32, i: u32, s: u32) -> Vec<InversionRisk> {
        match InvertedHexagram.analyze(&ctx(e, i, s)).unwrap().computed_data {
            Some(Findings::Inverted(f)) => f.risks,
            other => panic!("unexpected findings {other:?}"),
        }
    }

    #[test]
    fn heaven_inverts_to_earth() {
        let r = risks(1, 2, 11);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].level, Severity::Medium);
    }

    #[test]
    fn safe_mode_opposite_is_high_risk() {
        // peace and standstill are line-for-line opposites
        let r = risks(11, 5, 12);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].source, ProfileRole::Engine);
        assert_eq!(r[0].target, ProfileRole::SafeMode);
        assert_eq!(r[0].level, Severity::High);
    }

    #[test]
    fn unrelated_profiles_carry_no_risk() {
        assert!(risks(3, 51, 52).is_empty());
        // difficulty and the cauldron are opposites
        assert_eq!(risks(3, 51, 50)[0].level, Severity::High);
    }
}
