//! Trigram resonance across the six trigram slots of the three profiles.

use super::types::{DiagnosticRecord, Findings};
use super::{AnalysisContext, AnalysisMethod, Analyzer, ROLES, manifestations};
use crate::error::Result;
use crate::knowledge::TrigramId;
use serde::Serialize;
use std::collections::BTreeMap;

pub struct TrigramResonance;

pub const RESONANT_COUNT: usize = 2;
pub const STRONG_COUNT: usize = 3;
const DOMINANT_LIMIT: usize = 3;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResonantTrigram {
    pub id: TrigramId,
    pub name: &'static str,
    pub nature: &'static str,
    pub count: usize,
    pub strong: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResonanceFindings {
    pub counts: BTreeMap<TrigramId, usize>,
    /// Count descending, then id ascending.
    pub resonant: Vec<ResonantTrigram>,
    pub dominant: Vec<TrigramId>,
}

impl Analyzer for TrigramResonance {
    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::TrigramResonance
    }

    fn analyze(&self, ctx: &AnalysisContext) -> Result<DiagnosticRecord> {
        let mut counts: BTreeMap<TrigramId, usize> = BTreeMap::new();
        for role in ROLES {
            *counts.entry(ctx.upper(role).id).or_default() += 1;
            *counts.entry(ctx.lower(role).id).or_default() += 1;
        }

        let mut resonant = Vec::new();
        for (&id, &count) in counts.iter().filter(|(_, c)| **c >= RESONANT_COUNT) {
            let t = ctx.kb().trigram(id)?;
            resonant.push(ResonantTrigram {
                id,
                name: t.name,
                nature: t.nature,
                count,
                strong: count >= STRONG_COUNT,
            });
        }
        resonant.sort_by(|a, b| b.count.cmp(&a.count).then(a.id.cmp(&b.id)));
        let dominant: Vec<TrigramId> = resonant.iter().take(DOMINANT_LIMIT).map(|r| r.id).collect();

        let diagnosis = match resonant.first() {
            Some(top) if top.count == 6 => format!(
                "{} ({}) fills every slot: one resonance runs through the whole person.",
                top.name, top.nature
            ),
            Some(top) if top.strong => format!(
                "{} ({}) resonates strongly, appearing {} times across the profiles.",
                top.name, top.nature, top.count
            ),
            Some(_) => format!(
                "{} trigram(s) resonate between profiles, giving shared ground.",
                resonant.len()
            ),
            None => "No trigram repeats; each profile draws on separate imagery.".to_string(),
        };

        let mut items = vec![
            format!("{} distinct trigrams across six slots", counts.len()),
            if resonant.is_empty() {
                "Behavior shifts noticeably between contexts".to_string()
            } else {
                "Familiar responses recur across contexts".to_string()
            },
        ];
        for r in resonant.iter().take(2) {
            items.push(format!("{} ({}) appears {} times", r.name, r.nature, r.count));
        }

        Ok(DiagnosticRecord::computed(
            self.method(),
            Findings::Resonance(ResonanceFindings {
                counts,
                resonant,
                dominant,
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

    fn findings(e: u32, i: u32, s: u32) -> ResonanceFindings {
        TrigramResonance
            .analyze(&ctx(e, i, s))
            .unwrap()
            .resonance()
            .cloned()
            .unwrap()
    }

    #[test]
    fn single_hexagram_yields_one_trigram_with_count_six() {
        let f = findings(1, 1, 1);
        assert_eq!(f.resonant.len(), 1);
        assert_eq!(f.resonant[0].id, 1);
        assert_eq!(f.resonant[0].count, 6);
        assert_eq!(f.dominant, vec![1]);
    }

    #[test]
    fn dominant_sorted_by_count_then_id() {
        // heaven ×3 (1 twice, 11 once), earth ×3 (2 twice, 11 once)
        let f = findings(1, 2, 11);
        assert_eq!(f.dominant, vec![1, 8]);
        assert!(f.resonant.iter().all(|r| r.strong));
    }

    #[test]
    fn no_repeats_means_no_resonance() {
        // water/thunder, fire/wind, mountain/lake
        let f = findings(3, 50, 41);
        assert!(f.resonant.is_empty());
        assert!(f.dominant.is_empty());
        assert_eq!(f.counts.values().sum::<usize>(), 6);
    }
}
