//! Ruler (line 5) and minister (line 2) alignment within each profile.

use super::types::{DiagnosticRecord, Findings};
use super::{AnalysisContext, AnalysisMethod, Analyzer, ROLES, manifestations, round3};
use crate::error::Result;
use crate::profile::ProfileRole;
use serde::Serialize;

pub struct RulerMinisterAlignment;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RulerMinister {
    pub role: ProfileRole,
    pub ruler: u8,
    pub minister: u8,
    /// Ruler and minister lines match.
    pub aligned: bool,
    /// Firm ruler over yielding minister: the classical correct pairing.
    pub complementary: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RulerFindings {
    pub profiles: Vec<RulerMinister>,
    pub alignment_score: f64,
}

impl Analyzer for RulerMinisterAlignment {
    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::RulerMinisterAlignment
    }

    fn analyze(&self, ctx: &AnalysisContext) -> Result<DiagnosticRecord> {
        let profiles: Vec<RulerMinister> = ROLES
            .iter()
            .map(|&role| {
                let lines = ctx.hexagram(role).lines;
                let ruler = lines.at(5).unwrap_or_default();
                let minister = lines.at(2).unwrap_or_default();
                RulerMinister {
                    role,
                    ruler,
                    minister,
                    aligned: ruler == minister,
                    complementary: ruler == 1 && minister == 0,
                }
            })
            .collect();

        let aligned = profiles.iter().filter(|p| p.aligned).count();
        let alignment_score = aligned as f64 / profiles.len() as f64;

        let diagnosis = match aligned {
            3 => "Leadership and support point the same way in every profile.".to_string(),
            0 => "In every profile the leading and supporting impulses disagree.".to_string(),
            n => format!("Leadership and support agree in {n} of 3 profiles."),
        };

        let mut items: Vec<String> = profiles
            .iter()
            .map(|p| {
                let stance = match (p.aligned, p.complementary) {
                    (true, _) => "decides and carries out in one voice",
                    (false, true) => "leads firmly and delegates softly",
                    (false, false) => "defers at the top while pushing from below",
                };
                format!("{} {}", p.role, stance)
            })
            .collect();
        if profiles.iter().any(|p| p.complementary) {
            items.push("At least one profile has the classical firm-ruler, yielding-minister pairing".to_string());
        }

        Ok(DiagnosticRecord::computed(
            self.method(),
            Findings::Ruler(RulerFindings {
                profiles,
                alignment_score: round3(alignment_score),
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
    fn pure_figures_are_aligned_and_peace_is_not() {
        let record = RulerMinisterAlignment.analyze(&ctx(1, 2, 11)).unwrap();
        let Some(Findings::Ruler(f)) = record.computed_data else {
            panic!("expected ruler findings");
        };
        assert!(f.profiles[0].aligned);
        assert!(f.profiles[1].aligned);
        // peace: yielding ruler, firm minister
        assert!(!f.profiles[2].aligned);
        assert!(!f.profiles[2].complementary);
        assert!((f.alignment_score - 0.667).abs() < 1e-9);
    }

    #[test]
    fn standstill_is_complementary() {
        let record = RulerMinisterAlignment.analyze(&ctx(12, 12, 12)).unwrap();
        let Some(Findings::Ruler(f)) = record.computed_data else {
            panic!("expected ruler findings");
        };
        assert!(f.profiles.iter().all(|p| p.complementary));
        assert_eq!(f.alignment_score, 0.0);
    }
}
