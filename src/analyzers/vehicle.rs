//! Vehicle: how fast and how readily each profile moves.

use super::types::{DiagnosticRecord, Findings};
use super::{AnalysisContext, AnalysisMethod, Analyzer, ROLES, manifestations, round3};
use crate::error::Result;
use crate::profile::ProfileRole;
use serde::Serialize;

pub struct Vehicle;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mobility {
    pub role: ProfileRole,
    pub mobility: f64,
    pub speed: f64,
    pub direction: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Synchronized,
    Uneven,
    Divergent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleFindings {
    pub profiles: Vec<Mobility>,
    pub spread: f64,
    pub pace: Pace,
}

impl Analyzer for Vehicle {
    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::Vehicle
    }

    fn analyze(&self, ctx: &AnalysisContext) -> Result<DiagnosticRecord> {
        let profiles: Vec<Mobility> = ROLES
            .iter()
            .map(|&role| {
                let (u, l) = (ctx.upper(role), ctx.lower(role));
                Mobility {
                    role,
                    mobility: round3((u.mobility + l.mobility) / 2.0),
                    speed: round3((u.speed + l.speed) / 2.0),
                    direction: u.direction,
                }
            })
            .collect();

        let (lo, hi) = profiles
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), p| {
                (lo.min(p.mobility), hi.max(p.mobility))
            });
        let spread = round3(hi - lo);
        let pace = if spread < 0.2 {
            Pace::Synchronized
        } else if spread <= 0.5 {
            Pace::Uneven
        } else {
            Pace::Divergent
        };

        let fastest = profiles
            .iter()
            .max_by(|a, b| a.speed.total_cmp(&b.speed))
            .map(|p| p.role)
            .unwrap_or(ProfileRole::Engine);

        let diagnosis = match pace {
            Pace::Synchronized => "All profiles move at a similar pace; switching does not jolt.".to_string(),
            Pace::Uneven => format!("Pace varies between profiles; {fastest} sets the tempo."),
            Pace::Divergent => format!(
                "The profiles move at very different speeds; {fastest} races ahead of the rest."
            ),
        };

        let items = vec![
            format!("Mobility spread {:.2}", spread),
            format!(
                "Engine heads {}, Interface heads {}",
                profiles[0].direction, profiles[1].direction
            ),
            format!("Fastest response comes from {fastest}"),
        ];

        Ok(DiagnosticRecord::computed(
            self.method(),
            Findings::Vehicle(VehicleFindings {
                profiles,
                spread,
                pace,
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
    fn heaven_and_mountain_diverge() {
        let record = Vehicle.analyze(&ctx(1, 52, 52)).unwrap();
        let Some(Findings::Vehicle(f)) = record.computed_data else {
            panic!("expected vehicle findings");
        };
        assert_eq!(f.spread, 0.7);
        assert_eq!(f.pace, Pace::Divergent);
        assert_eq!(f.profiles[0].direction, "northwest");
    }

    #[test]
    fn close_mobility_is_synchronized() {
        let record = Vehicle.analyze(&ctx(1, 51, 30)).unwrap();
        let Some(Findings::Vehicle(f)) = record.computed_data else {
            panic!("expected vehicle findings");
        };
        assert_eq!(f.spread, 0.1);
        assert_eq!(f.pace, Pace::Synchronized);
        assert!(record.diagnosis.starts_with("All profiles move at a similar pace"));
    }

    #[test]
    fn moderate_spread_is_uneven() {
        let record = Vehicle.analyze(&ctx(1, 57, 57)).unwrap();
        let Some(Findings::Vehicle(f)) = record.computed_data else {
            panic!("expected vehicle findings");
        };
        assert_eq!(f.pace, Pace::Uneven);
        assert_eq!(
            record.diagnosis,
            "Pace varies between profiles; Engine sets the tempo."
        );
    }
}
