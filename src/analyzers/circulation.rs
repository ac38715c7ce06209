//! Coming and going: how energy circulates through each profile, from the
//! trigram flow table and the density of firm lines.

use super::types::{DiagnosticRecord, Findings};
use super::{AnalysisContext, AnalysisMethod, Analyzer, ROLES, manifestations, mean, round3};
use crate::error::Result;
use crate::knowledge::Flow;
use crate::profile::ProfileRole;
use crate::transform::LINE_COUNT;
use serde::Serialize;

pub struct ComingGoing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Circulation {
    Ascending,
    Balanced,
    Descending,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFlow {
    pub role: ProfileRole,
    pub outer: Flow,
    pub inner: Flow,
    pub yang_density: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CirculationFindings {
    pub flows: Vec<ProfileFlow>,
    pub circulation_score: f64,
    pub circulation: Circulation,
}

fn flow_word(flow: Flow) -> &'static str {
    match flow {
        Flow::Rising => "rising",
        Flow::Expressing => "expressing",
        Flow::Radiating => "radiating",
        Flow::Vibrating => "vibrating",
        Flow::Penetrating => "penetrating",
        Flow::Descending => "descending",
        Flow::Resting => "resting",
        Flow::Receiving => "receiving",
    }
}

impl Analyzer for ComingGoing {
    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::ComingGoing
    }

    fn analyze(&self, ctx: &AnalysisContext) -> Result<DiagnosticRecord> {
        let flows: Vec<ProfileFlow> = ROLES
            .iter()
            .map(|&role| ProfileFlow {
                role,
                outer: ctx.upper(role).flow,
                inner: ctx.lower(role).flow,
                yang_density: round3(
                    ctx.hexagram(role).lines.yang_count() as f64 / LINE_COUNT as f64,
                ),
            })
            .collect();

        let densities: Vec<f64> = flows.iter().map(|f| f.yang_density).collect();
        let circulation_score = mean(&densities);
        let circulation = if circulation_score > 0.6 {
            Circulation::Ascending
        } else if circulation_score < 0.4 {
            Circulation::Descending
        } else {
            Circulation::Balanced
        };

        let diagnosis = match circulation {
            Circulation::Ascending => {
                "Energy mostly goes out: the person spends readily and must watch for depletion."
            }
            Circulation::Descending => {
                "Energy mostly comes in: the person gathers and holds, and may need prompting to act."
            }
            Circulation::Balanced => "What goes out and what comes in stay roughly in balance.",
        };

        let mut items: Vec<String> = flows
            .iter()
            .take(2)
            .map(|f| {
                format!(
                    "{}: {} outside, {} inside",
                    f.role,
                    flow_word(f.outer),
                    flow_word(f.inner)
                )
            })
            .collect();
        items.push(format!("Average firm-line density {:.2}", circulation_score));

        Ok(DiagnosticRecord::computed(
            self.method(),
            Findings::Circulation(CirculationFindings {
                flows,
                circulation_score: round3(circulation_score),
                circulation,
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

    fn findings(e: u32, i: u32, s: u32) -> CirculationFindings {
        match ComingGoing.analyze(&ctx(e, i, s)).unwrap().computed_data {
            Some(Findings::Circulation(f)) => f,
            other => panic!("unexpected findings {other:?}"),
        }
    }

    #[test]
    fn density_sets_direction() {
        assert_eq!(findings(1, 1, 43).circulation, Circulation::Ascending);
        assert_eq!(findings(2, 2, 23).circulation, Circulation::Descending);
        assert_eq!(findings(1, 2, 11).circulation, Circulation::Balanced);
    }

    #[test]
    fn flows_follow_trigrams() {
        let f = findings(11, 1, 1);
        assert_eq!(f.flows[0].outer, Flow::Receiving);
        assert_eq!(f.flows[0].inner, Flow::Rising);
        assert_eq!(f.flows[0].yang_density, 0.5);
    }
}
