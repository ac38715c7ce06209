//! Great-theme agreement: fortune classes and keyword overlap of the three
//! hexagrams' judgments.

use super::types::{DiagnosticRecord, Findings};
use super::{AnalysisContext, AnalysisMethod, Analyzer, label, manifestations, mean, round3};
use crate::error::Result;
use crate::knowledge::FortuneClass;
use serde::Serialize;
use std::collections::BTreeSet;

pub struct GreatTheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ThemePattern {
    FullyUnified,
    AllAuspicious,
    AllAdverse,
    Mixed,
    Growth,
    Profit,
    Overcoming,
    Complex,
}

impl ThemePattern {
    pub fn describe(self) -> &'static str {
        match self {
            ThemePattern::FullyUnified => "fully unified",
            ThemePattern::AllAuspicious => "all auspicious",
            ThemePattern::AllAdverse => "all adverse",
            ThemePattern::Mixed => "mixed fortune",
            ThemePattern::Growth => "growth oriented",
            ThemePattern::Profit => "profit through effort",
            ThemePattern::Overcoming => "overcoming adversity",
            ThemePattern::Complex => "complex",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeFindings {
    pub themes: [&'static str; 3],
    pub fortunes: [FortuneClass; 3],
    pub average_fortune: f64,
    pub semantic_distance: f64,
    pub harmony: f64,
    pub shared_keywords: Vec<&'static str>,
    pub pattern: ThemePattern,
}

fn is_adverse(f: FortuneClass) -> bool {
    matches!(f, FortuneClass::Regret | FortuneClass::Ominous)
}

/// First matching rule wins.
pub fn classify(ids: [u32; 3], fortunes: [FortuneClass; 3]) -> ThemePattern {
    let count = |pred: &dyn Fn(FortuneClass) -> bool| fortunes.iter().filter(|f| pred(**f)).count();
    let auspicious = count(&|f: FortuneClass| f == FortuneClass::Auspicious);

    if ids[0] == ids[1] && ids[1] == ids[2] {
        ThemePattern::FullyUnified
    } else if auspicious == 3 {
        ThemePattern::AllAuspicious
    } else if count(&is_adverse) == 3 {
        ThemePattern::AllAdverse
    } else if auspicious == 2 {
        ThemePattern::Mixed
    } else if count(&|f: FortuneClass| f == FortuneClass::Prosperous) > 0 {
        ThemePattern::Growth
    } else if count(&|f: FortuneClass| f == FortuneClass::Favorable) > 0 {
        ThemePattern::Profit
    } else if count(&is_adverse) > 0 {
        ThemePattern::Overcoming
    } else {
        ThemePattern::Complex
    }
}

impl Analyzer for GreatTheme {
    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::GreatTheme
    }

    fn analyze(&self, ctx: &AnalysisContext) -> Result<DiagnosticRecord> {
        let [(_, e), (_, i), (_, s)] = ctx.hexagrams();
        let fortunes = [e.fortune, i.fortune, s.fortune];
        let average_fortune = mean(&fortunes.map(FortuneClass::value));

        let all: Vec<&'static str> = [e, i, s]
            .iter()
            .flat_map(|h| h.keywords.iter().copied())
            .collect();
        let unique: BTreeSet<&'static str> = all.iter().copied().collect();
        let overlap = (all.len() - unique.len()) as f64 / all.len() as f64;
        let semantic_distance = 1.0 - overlap;
        let shared_keywords: Vec<&'static str> = unique
            .iter()
            .copied()
            .filter(|k| all.iter().filter(|a| *a == k).count() > 1)
            .collect();

        let harmony = (0.5 * average_fortune + 0.5 * (1.0 - semantic_distance)).clamp(0.0, 1.0);
        let pattern = classify([e.id, i.id, s.id], fortunes);

        let diagnosis = match pattern {
            ThemePattern::FullyUnified => format!(
                "All three profiles rest on {}: a fully unified theme, \"{}\".",
                label(e),
                e.theme
            ),
            ThemePattern::AllAuspicious => {
                "Every profile carries an auspicious judgment; the themes reinforce each other."
                    .to_string()
            }
            ThemePattern::AllAdverse => {
                "All three judgments are adverse; strength comes from facing difficulty directly."
                    .to_string()
            }
            _ => format!(
                "Theme agreement is {} (harmony {:.2}) across \"{}\", \"{}\" and \"{}\".",
                pattern.describe(),
                harmony,
                e.theme,
                i.theme,
                s.theme
            ),
        };

        let mut items = vec![
            format!("Engine pursues \"{}\"", e.theme),
            format!("Interface presents \"{}\"", i.theme),
        ];
        if !shared_keywords.is_empty() {
            items.push(format!("Recurring motifs: {}", shared_keywords.join(", ")));
        }
        items.push(format!("Under pressure the theme shifts to \"{}\"", s.theme));

        Ok(DiagnosticRecord::computed(
            self.method(),
            Findings::Theme(ThemeFindings {
                themes: [e.theme, i.theme, s.theme],
                fortunes,
                average_fortune: round3(average_fortune),
                semantic_distance: round3(semantic_distance),
                harmony: round3(harmony),
                shared_keywords,
                pattern,
            }),
            diagnosis,
            manifestations(items),
        ))
    }
}
