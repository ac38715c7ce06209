//! Ritual and oracle: intuition, from sacred and intuitive trigrams and the
//! two hexagrams that deal with consulting the oracle (Meng, Guan).

use super::types::{DiagnosticRecord, Findings};
use super::{AnalysisContext, AnalysisMethod, Analyzer, ROLES, manifestations, mean, round3};
use crate::error::Result;
use crate::knowledge::HexagramId;
use crate::profile::ProfileRole;
use serde::Serialize;

pub struct RitualOracle;

const ORACLE_HEXAGRAMS: [HexagramId; 2] = [4, 20];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntuitionProfile {
    pub role: ProfileRole,
    pub sacred_trigrams: usize,
    pub intuitive_trigrams: usize,
    pub oracle_hexagram: bool,
    pub intuition: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleFindings {
    pub profiles: Vec<IntuitionProfile>,
    pub intuition_score: f64,
}

impl Analyzer for RitualOracle {
    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::RitualOracle
    }

    fn analyze(&self, ctx: &AnalysisContext) -> Result<DiagnosticRecord> {
        let profiles: Vec<IntuitionProfile> = ROLES
            .iter()
            .map(|&role| {
                let trigrams = [ctx.upper(role), ctx.lower(role)];
                let sacred_trigrams = trigrams.iter().filter(|t| t.sacred).count();
                let intuitive_trigrams = trigrams.iter().filter(|t| t.intuitive).count();
                let oracle_hexagram = ORACLE_HEXAGRAMS.contains(&ctx.hexagram(role).id);
                let intuition = 0.3
                    + 0.15 * sacred_trigrams as f64
                    + 0.15 * intuitive_trigrams as f64
                    + if oracle_hexagram { 0.2 } else { 0.0 };
                IntuitionProfile {
                    role,
                    sacred_trigrams,
                    intuitive_trigrams,
                    oracle_hexagram,
                    intuition: round3(intuition.min(1.0)),
                }
            })
            .collect();

        let values: Vec<f64> = profiles.iter().map(|p| p.intuition).collect();
        let intuition_score = mean(&values);

        let diagnosis = if profiles.iter().any(|p| p.oracle_hexagram) {
            "An oracle hexagram is present: the person seeks guidance beyond analysis and acts on it."
        } else if intuition_score >= 0.6 {
            "Intuition runs deep; hunches are often trusted over argument."
        } else if intuition_score >= 0.45 {
            "Intuition is available but checked against reason."
        } else {
            "Decisions lean on evidence rather than inner signals."
        };

        let mut items = vec![
            format!("Intuition score {:.2}", intuition_score),
            format!(
                "Engine intuition {:.2}, Safe Mode intuition {:.2}",
                profiles[0].intuition, profiles[2].intuition
            ),
        ];
        items.extend(
            profiles
                .iter()
                .filter(|p| p.sacred_trigrams > 0)
                .take(2)
                .map(|p| format!("{} draws on a sense of the sacred", p.role)),
        );

        Ok(DiagnosticRecord::computed(
            self.method(),
            Findings::Oracle(OracleFindings {
                profiles,
                intuition_score: round3(intuition_score),
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
    fn water_doubles_sacred_and_intuitive() {
        let record = RitualOracle.analyze(&ctx(29, 20, 51)).unwrap();
        let Some(Findings::Oracle(f)) = record.computed_data else {
            panic!("expected oracle findings");
        };
        // kan: 0.3 + 2×0.15 + 2×0.15
        assert_eq!(f.profiles[0].intuition, 0.9);
        assert!(f.profiles[1].oracle_hexagram);
        assert_eq!(f.profiles[2].sacred_trigrams, 0);
    }

    #[test]
    fn oracle_hexagram_takes_precedence() {
        let record = RitualOracle.analyze(&ctx(29, 20, 51)).unwrap();
        assert!(record.diagnosis.starts_with("An oracle hexagram is present"));
    }

    #[test]
    fn diagnosis_follows_intuition_score() {
        let cases = [
            ((29, 30, 2), "Intuition runs deep"),
            ((1, 51, 30), "Intuition is available"),
            ((51, 57, 58), "Decisions lean on evidence"),
        ];
        for ((e, i, s), expected) in cases {
            let record = RitualOracle.analyze(&ctx(e, i, s)).unwrap();
            assert!(
                record.diagnosis.starts_with(expected),
                "{e}/{i}/{s}: {}",
                record.diagnosis
            );
        }
    }
}
