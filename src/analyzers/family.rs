//! Family dynamics between the trigram family roles of the profiles.

use super::types::{DiagnosticRecord, Findings};
use super::{AnalysisContext, AnalysisMethod, Analyzer, ROLES, manifestations};
use crate::error::Result;
use crate::knowledge::FamilyRole;
use crate::profile::ProfileRole;
use serde::Serialize;

pub struct FamilyDynamics;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyPlacement {
    pub role: ProfileRole,
    pub outer: FamilyRole,
    pub inner: FamilyRole,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyFindings {
    pub placements: Vec<FamilyPlacement>,
    pub parents_present: bool,
    /// Engine outer rank minus Interface outer rank.
    pub hierarchy_gap: i8,
    pub dynamics: Vec<String>,
}

fn role_word(r: FamilyRole) -> &'static str {
    match r {
        FamilyRole::Father => "father",
        FamilyRole::Mother => "mother",
        FamilyRole::EldestSon => "eldest son",
        FamilyRole::MiddleSon => "middle son",
        FamilyRole::YoungestSon => "youngest son",
        FamilyRole::EldestDaughter => "eldest daughter",
        FamilyRole::MiddleDaughter => "middle daughter",
        FamilyRole::YoungestDaughter => "youngest daughter",
    }
}

impl Analyzer for FamilyDynamics {
    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::FamilyDynamics
    }

    fn analyze(&self, ctx: &AnalysisContext) -> Result<DiagnosticRecord> {
        let placements: Vec<FamilyPlacement> = ROLES
            .iter()
            .map(|&role| FamilyPlacement {
                role,
                outer: ctx.upper(role).family,
                inner: ctx.lower(role).family,
            })
            .collect();

        let all_roles: Vec<FamilyRole> = placements
            .iter()
            .flat_map(|p| [p.outer, p.inner])
            .collect();
        let parents_present = all_roles
            .iter()
            .any(|r| matches!(r, FamilyRole::Father | FamilyRole::Mother));
        let hierarchy_gap = placements[0].outer.rank() as i8 - placements[1].outer.rank() as i8;

        let mut dynamics = Vec::new();
        if all_roles.contains(&FamilyRole::Father) && all_roles.contains(&FamilyRole::Mother) {
            dynamics.push("both parental principles are present: a complete household".to_string());
        }
        let eldest = all_roles.iter().filter(|r| r.is_eldest()).count();
        if eldest >= 2 {
            dynamics.push("more than one eldest child: rivalry over responsibility".to_string());
        }
        if hierarchy_gap > 0 {
            dynamics.push("the Engine outranks the Interface: inner authority behind a humbler role".to_string());
        } else if hierarchy_gap < 0 {
            dynamics.push("the Interface outranks the Engine: the public role carries more weight than the drive behind it".to_string());
        }

        let diagnosis = if parents_present {
            format!(
                "A parental figure anchors the system; the Engine acts as the {}.",
                role_word(placements[0].outer)
            )
        } else {
            format!(
                "Only sibling roles appear; the Engine acts as the {} among equals.",
                role_word(placements[0].outer)
            )
        };

        let mut items: Vec<String> = placements
            .iter()
            .take(2)
            .map(|p| {
                format!(
                    "{} behaves like the {} over the {}",
                    p.role,
                    role_word(p.outer),
                    role_word(p.inner)
                )
            })
            .collect();
        items.extend(dynamics.iter().take(2).cloned());

        Ok(DiagnosticRecord::computed(
            self.method(),
            Findings::Family(FamilyFindings {
                placements,
                parents_present,
                hierarchy_gap,
                dynamics,
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
    fn father_and_mother_complete_the_household() {
        let record = FamilyDynamics.analyze(&ctx(1, 2, 11)).unwrap();
        let Some(Findings::Family(f)) = record.computed_data else {
            panic!("expected family findings");
        };
        assert!(f.parents_present);
        assert_eq!(f.hierarchy_gap, 0);
        assert!(f.dynamics[0].contains("complete household"));
    }

    #[test]
    fn siblings_only() {
        // thunder/thunder, wind/wind, fire/fire
        let record = FamilyDynamics.analyze(&ctx(51, 57, 30)).unwrap();
        let Some(Findings::Family(f)) = record.computed_data else {
            panic!("expected family findings");
        };
        assert!(!f.parents_present);
        assert!(f.dynamics.iter().any(|d| d.contains("rivalry")));
    }
}
