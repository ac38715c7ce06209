//! Virtue: the character strengths each profile's trigrams stand for.

use super::types::{DiagnosticRecord, Findings};
use super::{AnalysisContext, AnalysisMethod, Analyzer, ROLES, manifestations, mean, round3};
use crate::error::Result;
use crate::profile::ProfileRole;
use serde::Serialize;

pub struct Virtue;

const CANON_BONUS: f64 = 0.1;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtueProfile {
    pub role: ProfileRole,
    pub virtues: [&'static str; 2],
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtueFindings {
    pub profiles: Vec<VirtueProfile>,
    pub virtue_score: f64,
    pub leading_virtue: &'static str,
}

impl Analyzer for Virtue {
    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::Virtue
    }

    fn analyze(&self, ctx: &AnalysisContext) -> Result<DiagnosticRecord> {
        let mut leading = ("", f64::MIN);
        let profiles: Vec<VirtueProfile> = ROLES
            .iter()
            .map(|&role| {
                let (u, l) = (ctx.upper(role), ctx.lower(role));
                for t in [u, l] {
                    if t.virtue_weight > leading.1 {
                        leading = (t.virtue, t.virtue_weight);
                    }
                }
                let bonus = if ctx.hexagram(role).upper_canon() {
                    CANON_BONUS
                } else {
                    0.0
                };
                VirtueProfile {
                    role,
                    virtues: [u.virtue, l.virtue],
                    score: round3(((u.virtue_weight + l.virtue_weight) / 2.0 + bonus).min(1.0)),
                }
            })
            .collect();

        let scores: Vec<f64> = profiles.iter().map(|p| p.score).collect();
        let virtue_score = mean(&scores);

        let diagnosis = format!(
            "{} is the leading virtue; overall character strength {:.2}.",
            capitalize(leading.0),
            virtue_score
        );

        let items: Vec<String> = profiles
            .iter()
            .map(|p| {
                if p.virtues[0] == p.virtues[1] {
                    format!("{} shows {} through and through", p.role, p.virtues[0])
                } else {
                    format!("{} shows {} outwardly and {} within", p.role, p.virtues[0], p.virtues[1])
                }
            })
            .collect();

        Ok(DiagnosticRecord::computed(
            self.method(),
            Findings::Virtue(VirtueFindings {
                profiles,
                virtue_score: round3(virtue_score),
                leading_virtue: leading.0,
            }),
            diagnosis,
            manifestations(items),
        ))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::ctx;

    #[test]
    fn heaven_leads_with_strength() {
        let record = Virtue.analyze(&ctx(1, 52, 58)).unwrap();
        let Some(Findings::Virtue(f)) = record.computed_data else {
            panic!("expected virtue findings");
        };
        assert_eq!(f.leading_virtue, "strength");
        // 0.9 + canon bonus, capped
        assert_eq!(f.profiles[0].score, 1.0);
        assert_eq!(f.profiles[1].score, 0.75);
        assert!(record.diagnosis.starts_with("Strength"));
    }

    #[test]
    fn devotion_leads_without_heaven() {
        let record = Virtue.analyze(&ctx(2, 29, 57)).unwrap();
        let Some(Findings::Virtue(f)) = record.computed_data else {
            panic!("expected virtue findings");
        };
        assert_eq!(f.leading_virtue, "devotion");
        assert_eq!(f.profiles[0].score, 0.95);
        assert_eq!(f.profiles[2].score, 0.7);
        assert!(record.diagnosis.starts_with("Devotion is the leading virtue"));
        assert_eq!(
            record.manifestations[0],
            "Engine shows devotion through and through"
        );
    }

    #[test]
    fn split_trigrams_show_outer_and_inner_virtue() {
        let record = Virtue.analyze(&ctx(11, 29, 57)).unwrap();
        assert_eq!(
            record.manifestations[0],
            "Engine shows devotion outwardly and strength within"
        );
        assert!(record.diagnosis.starts_with("Strength"));
    }
}
