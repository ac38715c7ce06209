//! Five-element cycles between the profiles' upper-trigram elements.

use super::types::{DiagnosticRecord, Findings};
use super::{AnalysisContext, AnalysisMethod, Analyzer, PAIRS, ROLES, manifestations};
use crate::error::Result;
use crate::knowledge::{Element, ElementRelation};
use crate::profile::ProfileRole;
use serde::Serialize;

pub struct FiveElementCycles;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementFlow {
    /// Generative links only (kindred links allowed).
    Harmonious,
    /// Controlling links only.
    Conflicting,
    /// Both generative and controlling links.
    Mixed,
    /// All three share one element.
    Kindred,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementLink {
    pub from: ProfileRole,
    pub to: ProfileRole,
    pub from_element: Element,
    pub to_element: Element,
    pub relation: ElementRelation,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementFindings {
    pub elements: [Element; 3],
    pub links: Vec<ElementLink>,
    pub generative: usize,
    pub destructive: usize,
    pub flow: ElementFlow,
}

fn relation_text(link: &ElementLink) -> String {
    let (a, b) = (link.from_element.as_str(), link.to_element.as_str());
    match link.relation {
        ElementRelation::Kindred => format!("{} and {} share {}", link.from, link.to, a),
        ElementRelation::Generates => format!("{} ({a}) feeds {} ({b})", link.from, link.to),
        ElementRelation::GeneratedBy => format!("{} ({a}) is fed by {} ({b})", link.from, link.to),
        ElementRelation::Controls => format!("{} ({a}) restrains {} ({b})", link.from, link.to),
        ElementRelation::ControlledBy => {
            format!("{} ({a}) is restrained by {} ({b})", link.from, link.to)
        }
    }
}

impl Analyzer for FiveElementCycles {
    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::FiveElementCycles
    }

    fn analyze(&self, ctx: &AnalysisContext) -> Result<DiagnosticRecord> {
        let element_of = |role: ProfileRole| ctx.upper(role).element;
        let elements = ROLES.map(element_of);

        let links: Vec<ElementLink> = PAIRS
            .iter()
            .map(|&(from, to)| {
                let (a, b) = (element_of(from), element_of(to));
                ElementLink {
                    from,
                    to,
                    from_element: a,
                    to_element: b,
                    relation: a.relation_to(b),
                }
            })
            .collect();

        let generative = links.iter().filter(|l| l.relation.is_generative()).count();
        let destructive = links.iter().filter(|l| l.relation.is_destructive()).count();
        let flow = match (generative, destructive) {
            (0, 0) => ElementFlow::Kindred,
            (_, 0) => ElementFlow::Harmonious,
            (0, _) => ElementFlow::Conflicting,
            _ => ElementFlow::Mixed,
        };

        let diagnosis = match flow {
            ElementFlow::Kindred => format!(
                "All three profiles share the {} element; energy is uniform but lacks exchange.",
                elements[0].as_str()
            ),
            ElementFlow::Harmonious => {
                "The elements nourish one another; energy passes between profiles without friction."
                    .to_string()
            }
            ElementFlow::Conflicting => {
                "The elements restrain one another; switching between profiles costs energy."
                    .to_string()
            }
            ElementFlow::Mixed => {
                "Nourishing and restraining links coexist; some transitions help while others drain."
                    .to_string()
            }
        };

        let mut items = vec![format!(
            "Elements: Engine {}, Interface {}, Safe Mode {}",
            elements[0].as_str(),
            elements[1].as_str(),
            elements[2].as_str()
        )];
        items.extend(links.iter().map(relation_text));

        Ok(DiagnosticRecord::computed(
            self.method(),
            Findings::Elements(ElementFindings {
                elements,
                links,
                generative,
                destructive,
                flow,
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
    fn metal_over_earth_is_generative() {
        let record = FiveElementCycles.analyze(&ctx(1, 2, 11)).unwrap();
        let f = record.elements().unwrap();
        assert_eq!(f.elements, [Element::Metal, Element::Earth, Element::Earth]);
        assert!(f.links[0].relation.is_generative());
        assert_eq!(f.links[1].relation, ElementRelation::Kindred);
        assert_eq!(f.flow, ElementFlow::Harmonious);
    }

    #[test]
    fn wood_against_metal_conflicts() {
        // thunder above (wood), heaven above (metal), heaven above
        let record = FiveElementCycles.analyze(&ctx(51, 1, 1)).unwrap();
        let f = record.elements().unwrap();
        assert_eq!(f.links[0].relation, ElementRelation::ControlledBy);
        assert_eq!(f.flow, ElementFlow::Conflicting);
    }
}
