//! Vessel: how much each profile can hold and how steadily.

use super::types::{DiagnosticRecord, Findings};
use super::{AnalysisContext, AnalysisMethod, Analyzer, ROLES, manifestations, mean, round3};
use crate::error::Result;
use crate::profile::ProfileRole;
use serde::Serialize;

pub struct Vessel;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capacity {
    pub role: ProfileRole,
    pub capacity: f64,
    pub stability: f64,
    pub resilience: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VesselFindings {
    pub profiles: Vec<Capacity>,
    pub resilience: f64,
    pub weakest: ProfileRole,
}

impl Analyzer for Vessel {
    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::Vessel
    }

    fn analyze(&self, ctx: &AnalysisContext) -> Result<DiagnosticRecord> {
        let profiles: Vec<Capacity> = ROLES
            .iter()
            .map(|&role| {
                let (u, l) = (ctx.upper(role), ctx.lower(role));
                let capacity = (u.capacity + l.capacity) / 2.0;
                let stability = (u.stability + l.stability) / 2.0;
                Capacity {
                    role,
                    capacity: round3(capacity),
                    stability: round3(stability),
                    resilience: round3(0.5 * capacity + 0.5 * stability),
                }
            })
            .collect();

        let values: Vec<f64> = profiles.iter().map(|p| p.resilience).collect();
        let resilience = mean(&values);
        let weakest = profiles
            .iter()
            .min_by(|a, b| a.resilience.total_cmp(&b.resilience))
            .map(|p| p.role)
            .unwrap_or(ProfileRole::Engine);

        let diagnosis = if resilience >= 0.75 {
            "A deep, steady vessel: pressure is absorbed without spilling over.".to_string()
        } else if resilience >= 0.55 {
            format!("Adequate capacity overall; strain shows first in {weakest}.")
        } else {
            format!("Limited capacity; {weakest} overflows quickly under load.")
        };

        let items = vec![
            format!("Overall resilience {:.2}", resilience),
            format!("{weakest} is the first to fill up"),
            format!(
                "Safe Mode holds {:.2} and steadies at {:.2}",
                profiles[2].capacity, profiles[2].stability
            ),
        ];

        Ok(DiagnosticRecord::computed(
            self.method(),
            Findings::Vessel(VesselFindings {
                profiles,
                resilience: round3(resilience),
                weakest,
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
    fn thunder_is_the_weakest_vessel() {
        let record = Vessel.analyze(&ctx(2, 51, 52)).unwrap();
        let Some(Findings::Vessel(f)) = record.computed_data else {
            panic!("expected vessel findings");
        };
        assert_eq!(f.weakest, ProfileRole::Interface);
        assert_eq!(f.profiles[0].resilience, 0.9);
    }

    #[test]
    fn earth_mountain_and_water_hold_steady() {
        let record = Vessel.analyze(&ctx(2, 52, 29)).unwrap();
        let Some(Findings::Vessel(f)) = record.computed_data else {
            panic!("expected vessel findings");
        };
        assert!(f.resilience >= 0.75);
        assert_eq!(f.weakest, ProfileRole::SafeMode);
        assert!(record.diagnosis.starts_with("A deep, steady vessel"));
    }

    #[test]
    fn thunder_and_fire_overflow() {
        let record = Vessel.analyze(&ctx(51, 30, 30)).unwrap();
        assert_eq!(
            record.diagnosis,
            "Limited capacity; Engine overflows quickly under load."
        );
    }

    #[test]
    fn mixed_vessels_strain_at_the_weakest() {
        let record = Vessel.analyze(&ctx(2, 51, 52)).unwrap();
        assert_eq!(
            record.diagnosis,
            "Adequate capacity overall; strain shows first in Interface."
        );
    }
}
