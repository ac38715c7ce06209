//! Insight synthesis: folds the per-method records into patterns, advice and
//! four headline scores.
//!
//! Scores use fixed weights over a handful of findings. A missing or
//! substituted record contributes its neutral term, so the scores of a
//! degraded run stay comparable to a complete one.

use crate::analyzers::AnalysisMethod;
use crate::analyzers::elements::ElementFlow;
use crate::analyzers::theme::ThemePattern;
use crate::analyzers::types::{DiagnosticRecord, Severity};
use crate::error::Result;
use crate::knowledge::TrigramId;
use serde::Serialize;
use std::collections::BTreeMap;

pub type RecordMap = BTreeMap<AnalysisMethod, DiagnosticRecord>;

/// Trigrams whose dominance signals untapped drive: heaven, fire, thunder.
const ACTIVE_TRIGRAMS: [TrigramId; 3] = [1, 3, 4];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegratedInsights {
    pub primary_patterns: Vec<String>,
    pub deep_insights: Vec<String>,
    pub practical_advice: Vec<String>,
    pub warning_signals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallAssessment {
    pub harmony_score: f64,
    pub complexity_score: f64,
    pub potential_score: f64,
    pub risk_score: f64,
    /// Mean record confidence (0.7 for fallback runs, 0 on total failure).
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl OverallAssessment {
    pub fn empty(summary: impl Into<String>) -> Self {
        Self {
            harmony_score: 0.0,
            complexity_score: 0.0,
            potential_score: 0.0,
            risk_score: 0.0,
            confidence: 0.0,
            summary: Some(summary.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Synthesis {
    pub insights: IntegratedInsights,
    pub assessment: OverallAssessment,
}

/// Replaceable synthesis step. A failing synthesizer sends the orchestrator
/// down its fallback path.
pub trait Synthesizer: Send + Sync {
    fn synthesize(&self, records: &RecordMap) -> Result<Synthesis>;
}

/// Default synthesizer, a thin wrapper around [`synthesize`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InsightSynthesizer;

impl Synthesizer for InsightSynthesizer {
    fn synthesize(&self, records: &RecordMap) -> Result<Synthesis> {
        Ok(synthesize(records))
    }
}

/// Only computed (non-substitute) records take part.
struct Signals<'a> {
    theme_harmony: Option<f64>,
    theme_pattern: Option<ThemePattern>,
    dominant: &'a [TrigramId],
    element_flow: Option<ElementFlow>,
    line_conflicts: usize,
    high_line_conflict: bool,
    inversion_patterns: usize,
    inversion_severity: Option<Severity>,
}

impl<'a> Signals<'a> {
    fn read(records: &'a RecordMap) -> Self {
        let get = |m: AnalysisMethod| records.get(&m).filter(|r| !r.fallback);
        let theme = get(AnalysisMethod::GreatTheme).and_then(|r| r.theme());
        let resonance = get(AnalysisMethod::TrigramResonance).and_then(|r| r.resonance());
        let elements = get(AnalysisMethod::FiveElementCycles).and_then(|r| r.elements());
        let lines = get(AnalysisMethod::LineCorrespondence).and_then(|r| r.lines());
        let inversion =
            get(AnalysisMethod::InternalExternalInversion).and_then(|r| r.inversion());

        Self {
            theme_harmony: theme.map(|t| t.harmony),
            theme_pattern: theme.map(|t| t.pattern),
            dominant: resonance.map(|r| r.dominant.as_slice()).unwrap_or(&[]),
            element_flow: elements.map(|e| e.flow),
            line_conflicts: lines.map(|l| l.conflicts.len()).unwrap_or(0),
            high_line_conflict: lines.is_some_and(|l| l.has_high_severity()),
            inversion_patterns: inversion.map(|i| i.patterns.len()).unwrap_or(0),
            inversion_severity: inversion.map(|i| i.severity),
        }
    }

    fn harmonious_elements(&self) -> bool {
        self.element_flow == Some(ElementFlow::Harmonious)
    }

    fn high_inversion(&self) -> bool {
        self.inversion_severity == Some(Severity::High)
    }
}

fn harmony_score(s: &Signals<'_>) -> f64 {
    let theme = s.theme_harmony.unwrap_or(0.5);
    let resonance = if s.dominant.is_empty() { 0.5 } else { 0.7 };
    let elements = match s.element_flow {
        Some(ElementFlow::Harmonious) => 0.8,
        Some(ElementFlow::Conflicting) => 0.3,
        _ => 0.5,
    };
    (theme + resonance + elements) / 3.0
}

fn complexity_score(s: &Signals<'_>) -> f64 {
    let mut score = 0.5;
    if s.dominant.len() > 2 {
        score += 0.2;
    }
    if s.line_conflicts > 2 {
        score += 0.2;
    }
    if s.inversion_patterns > 1 {
        score += 0.1;
    }
    score
}

fn potential_score(s: &Signals<'_>) -> f64 {
    let mut score = 0.5;
    if s.theme_pattern == Some(ThemePattern::Growth) {
        score += 0.2;
    }
    if s.dominant.iter().any(|t| ACTIVE_TRIGRAMS.contains(t)) {
        score += 0.2;
    }
    if s.harmonious_elements() {
        score += 0.1;
    }
    score
}

fn risk_score(s: &Signals<'_>) -> f64 {
    let mut score = 0.2;
    if s.high_inversion() {
        score += 0.3;
    }
    if s.high_line_conflict {
        score += 0.2;
    }
    if s.theme_pattern == Some(ThemePattern::AllAdverse) {
        score += 0.2;
    }
    score
}

fn clamp_round(v: f64) -> f64 {
    (v.clamp(0.0, 1.0) * 1000.0).round() / 1000.0
}

/// Total: never fails, whatever subset of records is present.
pub fn synthesize(records: &RecordMap) -> Synthesis {
    let s = Signals::read(records);
    let harmony_high = s.theme_harmony.is_some_and(|h| h > 0.7);

    let mut insights = IntegratedInsights::default();

    if harmony_high {
        insights.primary_patterns.push("great theme harmony".to_string());
    }
    if !s.dominant.is_empty() {
        insights.primary_patterns.push("trigram resonance".to_string());
    }
    if s.harmonious_elements() {
        insights.primary_patterns.push("five-element harmony".to_string());
    }
    if s.theme_pattern == Some(ThemePattern::FullyUnified) {
        insights.primary_patterns.push("fully unified profiles".to_string());
    }

    if s.high_inversion() {
        insights.deep_insights.push(
            "Inner and outer energy are sharply opposed; the risk of burnout is high.".to_string(),
        );
    }
    if s.line_conflicts > 0 {
        insights.deep_insights.push(
            "Particular positions or roles are likely to bring on stress.".to_string(),
        );
    }

    if harmony_high {
        insights.practical_advice.push(
            "Keep the current inner harmony and build on the stability it gives.".to_string(),
        );
    }
    if s.high_inversion() {
        insights.practical_advice.push(
            "Separate on and off time clearly and schedule regular rest.".to_string(),
        );
    }
    if !s.dominant.is_empty() {
        insights.practical_advice.push(
            "Use your characteristic strengths deliberately to get better results.".to_string(),
        );
    }

    if s.high_inversion() {
        insights.warning_signals.push("burnout risk".to_string());
    }
    if s.high_line_conflict {
        insights
            .warning_signals
            .push("excess stress in specific roles".to_string());
    }

    let confidences: Vec<f64> = records.values().map(|r| r.confidence).collect();
    let confidence = if confidences.is_empty() {
        0.0
    } else {
        confidences.iter().sum::<f64>() / confidences.len() as f64
    };

    Synthesis {
        assessment: OverallAssessment {
            harmony_score: clamp_round(harmony_score(&s)),
            complexity_score: clamp_round(complexity_score(&s)),
            potential_score: clamp_round(potential_score(&s)),
            risk_score: clamp_round(risk_score(&s)),
            confidence: clamp_round(confidence),
            summary: None,
        },
        insights,
    }
}
