//! Flipped (upside-down) hexagrams: seeing a situation from the other
//! side. A profile that is another's flip is an ability, not a risk.

use super::types::{DiagnosticRecord, Findings};
use super::{AnalysisContext, AnalysisMethod, Analyzer, PAIRS, ROLES, manifestations};
use crate::error::Result;
use crate::knowledge::HexagramId;
use crate::profile::ProfileRole;
use crate::transform;
use serde::Serialize;

pub struct FlippedHexagram;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerspectiveAbility {
    pub between: [ProfileRole; 2],
    pub ability: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlippedFindings {
    pub flipped_ids: [HexagramId; 3],
    /// Profiles whose figure reads the same upside down.
    pub symmetric: Vec<ProfileRole>,
    pub abilities: Vec<PerspectiveAbility>,
}

fn ability_for(a: ProfileRole, b: ProfileRole) -> &'static str {
    match (a, b) {
        (ProfileRole::Engine, ProfileRole::Interface) => {
            "can present the inner drive from the audience's point of view"
        }
        (ProfileRole::Interface, ProfileRole::SafeMode) => {
            "recovers by looking at the social situation from the other side"
        }
        _ => "under pressure the core motive is reframed rather than abandoned",
    }
}

impl Analyzer for FlippedHexagram {
    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::FlippedHexagram
    }

    fn analyze(&self, ctx: &AnalysisContext) -> Result<DiagnosticRecord> {
        let kb = ctx.kb();
        let flipped_ids =
            ROLES.map(|r| kb.resolve(&transform::flipped(&ctx.hexagram(r).lines)));
        let symmetric: Vec<ProfileRole> = ROLES
            .iter()
            .zip(flipped_ids.iter())
            .filter(|(r, f)| ctx.hexagram(**r).id == **f)
            .map(|(r, _)| *r)
            .collect();

        // flipping is an involution, so each unordered pair is checked once
        let abilities: Vec<PerspectiveAbility> = PAIRS
            .iter()
            .filter(|(a, b)| {
                let a_id = ctx.hexagram(*a).id;
                let b_id = ctx.hexagram(*b).id;
                a_id != b_id && kb.resolve(&transform::flipped(&ctx.hexagram(*a).lines)) == b_id
            })
            .map(|&(a, b)| PerspectiveAbility {
                between: [a, b],
                ability: ability_for(a, b),
            })
            .collect();

        let diagnosis = if abilities.is_empty() {
            "No profile is the reverse view of another; perspective shifts have to be learned."
                .to_string()
        } else {
            format!(
                "Perspective-taking ability: {}.",
                abilities
                    .iter()
                    .map(|a| a.ability)
                    .collect::<Vec<_>>()
                    .join("; ")
            )
        };

        let mut items = vec![
            format!(
                "Reverse views: Engine #{}, Interface #{}, Safe Mode #{}",
                flipped_ids[0], flipped_ids[1], flipped_ids[2]
            ),
            if symmetric.is_empty() {
                "Every profile changes meaning when seen from the other side".to_string()
            } else {
                format!(
                    "{} profile(s) look the same from either side",
                    symmetric.len()
                )
            },
        ];
        items.extend(
            abilities
                .iter()
                .map(|a| format!("{} and {} mirror each other", a.between[0], a.between[1])),
        );

        Ok(DiagnosticRecord::computed(
            self.method(),
            Findings::Flipped(FlippedFindings {
                flipped_ids,
                symmetric,
                abilities,
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

    fn findings(e: u32, i: u32, s: u32) -> FlippedFindings {
        match FlippedHexagram.analyze(&ctx(e, i, s)).unwrap().computed_data {
            Some(Findings::Flipped(f)) => f,
            other => panic!("unexpected findings {other:?}"),
        }
    }

    #[test]
    fn difficulty_flips_into_youthful_folly() {
        let f = findings(3, 4, 1);
        assert_eq!(f.flipped_ids[0], 4);
        assert_eq!(f.abilities.len(), 1);
        assert_eq!(f.abilities[0].between, [ProfileRole::Engine, ProfileRole::Interface]);
        assert_eq!(f.symmetric, vec![ProfileRole::SafeMode]);
    }

    #[test]
    fn identical_profiles_are_not_an_ability() {
        let f = findings(1, 1, 1);
        assert!(f.abilities.is_empty());
        assert_eq!(f.symmetric.len(), 3);
    }
}
