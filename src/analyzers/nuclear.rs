//! Nuclear (hidden) hexagrams and where they coincide with the other profiles.

use super::types::{DiagnosticRecord, Findings};
use super::{AnalysisContext, AnalysisMethod, Analyzer, ROLES, label, manifestations};
use crate::error::Result;
use crate::knowledge::HexagramId;
use crate::profile::ProfileRole;
use crate::transform;
use serde::Serialize;

pub struct NuclearHexagram;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HiddenCore {
    pub role: ProfileRole,
    pub nuclear_id: HexagramId,
    pub name: &'static str,
    pub quality: &'static str,
}

/// `source`'s nuclear hexagram equals `target`'s surface hexagram.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NuclearCoincidence {
    pub source: ProfileRole,
    pub target: ProfileRole,
    pub hexagram_id: HexagramId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NuclearFindings {
    pub cores: Vec<HiddenCore>,
    pub coincidences: Vec<NuclearCoincidence>,
    /// Profiles whose hidden cores are the same hexagram.
    pub shared_core: bool,
}

impl Analyzer for NuclearHexagram {
    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::NuclearHexagram
    }

    fn analyze(&self, ctx: &AnalysisContext) -> Result<DiagnosticRecord> {
        let kb = ctx.kb();
        let cores: Vec<HiddenCore> = ROLES
            .iter()
            .map(|&role| {
                let nuclear = kb.resolve_hexagram(&transform::nuclear(&ctx.hexagram(role).lines));
                HiddenCore {
                    role,
                    nuclear_id: nuclear.id,
                    name: nuclear.name,
                    quality: nuclear.theme,
                }
            })
            .collect();

        let mut coincidences = Vec::new();
        for core in &cores {
            for &target in ROLES.iter().filter(|r| **r != core.role) {
                if ctx.hexagram(target).id == core.nuclear_id {
                    coincidences.push(NuclearCoincidence {
                        source: core.role,
                        target,
                        hexagram_id: core.nuclear_id,
                    });
                }
            }
        }
        let shared_core = cores[0].nuclear_id == cores[1].nuclear_id
            || cores[1].nuclear_id == cores[2].nuclear_id
            || cores[0].nuclear_id == cores[2].nuclear_id;

        let diagnosis = if let Some(c) = coincidences.first() {
            format!(
                "The hidden core of {} surfaces openly as {}: {} is latent in one profile and expressed in the other.",
                c.source,
                c.target,
                label(kb.hexagram_or_default(c.hexagram_id))
            )
        } else if shared_core {
            "Two profiles share the same hidden core beneath different surfaces.".to_string()
        } else {
            format!(
                "The Engine's hidden quality is \"{}\", not visible in any surface profile.",
                cores[0].quality
            )
        };

        let mut items: Vec<String> = cores
            .iter()
            .map(|c| format!("{} hides \"{}\" ({})", c.role, c.quality, c.name))
            .collect();
        if !coincidences.is_empty() {
            items.push(format!(
                "{} latent quality(ies) already expressed elsewhere",
                coincidences.len()
            ));
        }

        Ok(DiagnosticRecord::computed(
            self.method(),
            Findings::Nuclear(NuclearFindings {
                cores,
                coincidences,
                shared_core,
            }),
            diagnosis,
            manifestations(items),
        ))
    }
}
