//! Unchanging core: what stays constant beneath all three profiles.

use super::types::{DiagnosticRecord, Findings};
use super::{AnalysisContext, AnalysisMethod, Analyzer, PAIRS, ROLES, manifestations, mean, round3};
use crate::error::Result;
use crate::knowledge::{Element, ElementRelation};
use serde::Serialize;

pub struct Unchanging;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnchangingFindings {
    pub inner_elements: [Element; 3],
    pub element_consistency: f64,
    pub same_canon_half: bool,
    pub core_stability: f64,
}

fn consistency(rel: ElementRelation) -> f64 {
    match rel {
        ElementRelation::Kindred => 1.0,
        ElementRelation::Generates | ElementRelation::GeneratedBy => 0.5,
        ElementRelation::Controls | ElementRelation::ControlledBy => 0.0,
    }
}

impl Analyzer for Unchanging {
    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::Unchanging
    }

    fn analyze(&self, ctx: &AnalysisContext) -> Result<DiagnosticRecord> {
        let inner_elements = ROLES.map(|r| ctx.lower(r).element);
        let pair_scores: Vec<f64> = PAIRS
            .iter()
            .map(|&(a, b)| consistency(ctx.lower(a).element.relation_to(ctx.lower(b).element)))
            .collect();
        let element_consistency = mean(&pair_scores);
        let halves = ROLES.map(|r| ctx.hexagram(r).upper_canon());
        let same_canon_half = halves[0] == halves[1] && halves[1] == halves[2];
        let core_stability = 0.4
            + 0.3 * element_consistency
            + if same_canon_half { 0.3 } else { 0.0 };

        let diagnosis = if core_stability >= 0.8 {
            format!(
                "A stable core of {} runs beneath every profile; identity holds across contexts.",
                inner_elements[0].as_str()
            )
        } else if core_stability >= 0.55 {
            "The core is partly shared; some values survive every switch, others do not.".to_string()
        } else {
            "Little stays constant between profiles; identity is rebuilt in each context.".to_string()
        };

        let mut items = vec![
            format!(
                "Inner elements: {}, {}, {}",
                inner_elements[0].as_str(),
                inner_elements[1].as_str(),
                inner_elements[2].as_str()
            ),
            format!("Core stability {:.2}", core_stability),
        ];
        if same_canon_half {
            items.push("All profiles draw from the same half of the sequence".to_string());
        }

        Ok(DiagnosticRecord::computed(
            self.method(),
            Findings::Unchanging(UnchangingFindings {
                inner_elements,
                element_consistency: round3(element_consistency),
                same_canon_half,
                core_stability: round3(core_stability),
            }),
            diagnosis,
            manifestations(items),
        ))
    }
}
