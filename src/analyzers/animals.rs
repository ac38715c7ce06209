//! Symbolic animals of the outer trigrams and how well they get along.

use super::types::{DiagnosticRecord, Findings};
use super::{AnalysisContext, AnalysisMethod, Analyzer, PAIRS, ROLES, manifestations, mean, round3};
use crate::error::Result;
use crate::knowledge::ElementRelation;
use crate::profile::ProfileRole;
use serde::Serialize;

pub struct SymbolicAnimals;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalPairing {
    pub between: [ProfileRole; 2],
    pub animals: [&'static str; 2],
    pub compatibility: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalFindings {
    pub animals: [&'static str; 3],
    pub pairings: Vec<AnimalPairing>,
    pub compatibility: f64,
}

fn compatibility(rel: ElementRelation) -> f64 {
    match rel {
        ElementRelation::Kindred => 0.8,
        ElementRelation::Generates | ElementRelation::GeneratedBy => 0.7,
        ElementRelation::Controls | ElementRelation::ControlledBy => 0.3,
    }
}

impl Analyzer for SymbolicAnimals {
    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::SymbolicAnimals
    }

    fn analyze(&self, ctx: &AnalysisContext) -> Result<DiagnosticRecord> {
        let animals = ROLES.map(|r| ctx.upper(r).animal);
        let pairings: Vec<AnimalPairing> = PAIRS
            .iter()
            .map(|&(a, b)| {
                let (ta, tb) = (ctx.upper(a), ctx.upper(b));
                AnimalPairing {
                    between: [a, b],
                    animals: [ta.animal, tb.animal],
                    compatibility: compatibility(ta.element.relation_to(tb.element)),
                }
            })
            .collect();
        let values: Vec<f64> = pairings.iter().map(|p| p.compatibility).collect();
        let overall = mean(&values);

        let diagnosis = if overall >= 0.7 {
            format!(
                "The {}, the {} and the {} travel well together.",
                animals[0], animals[1], animals[2]
            )
        } else if overall >= 0.5 {
            format!(
                "The {} and the {} cooperate, though not without friction.",
                animals[0], animals[1]
            )
        } else {
            format!(
                "The {}, the {} and the {} pull against each other.",
                animals[0], animals[1], animals[2]
            )
        };

        let mut items = vec![format!(
            "Engine moves like the {}, Interface like the {}",
            animals[0], animals[1]
        )];
        items.extend(pairings.iter().map(|p| {
            format!(
                "{} and {}: compatibility {:.1}",
                p.animals[0], p.animals[1], p.compatibility
            )
        }));

        Ok(DiagnosticRecord::computed(
            self.method(),
            Findings::Animals(AnimalFindings {
                animals,
                pairings,
                compatibility: round3(overall),
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
    fn horse_and_ox_are_compatible() {
        let record = SymbolicAnimals.analyze(&ctx(1, 2, 2)).unwrap();
        let Some(Findings::Animals(f)) = record.computed_data else {
            panic!("expected animal findings");
        };
        assert_eq!(f.animals, ["horse", "ox", "ox"]);
        assert_eq!(f.pairings[0].compatibility, 0.7);
        assert_eq!(f.pairings[1].compatibility, 0.8);
    }

    #[test]
    fn compatible_animals_travel_together() {
        let record = SymbolicAnimals.analyze(&ctx(1, 2, 2)).unwrap();
        assert_eq!(
            record.diagnosis,
            "The horse, the ox and the ox travel well together."
        );
    }

    #[test]
    fn one_controlling_pair_adds_friction() {
        // metal, water, earth: two generating pairs, one controlling
        let record = SymbolicAnimals.analyze(&ctx(1, 29, 52)).unwrap();
        assert_eq!(
            record.diagnosis,
            "The horse and the pig cooperate, though not without friction."
        );
    }

    #[test]
    fn controlling_pairs_pull_apart() {
        // wood, earth, water
        let record = SymbolicAnimals.analyze(&ctx(51, 52, 29)).unwrap();
        let Some(Findings::Animals(f)) = record.computed_data else {
            panic!("expected animal findings");
        };
        assert!(f.compatibility < 0.5);
        assert_eq!(
            record.diagnosis,
            "The dragon, the dog and the pig pull against each other."
        );
    }
}
