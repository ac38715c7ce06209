//! Relationship analyzers: one pure heuristic per file, a closed method enum,
//! and a registry the orchestrator draws from.

pub mod animals;
pub mod changing;
pub mod circulation;
pub mod elements;
pub mod family;
pub mod flipped;
pub mod inversion;
pub mod inverted;
pub mod lines;
pub mod nuclear;
pub mod oracle;
pub mod resonance;
pub mod ruler;
pub mod seasons;
pub mod theme;
pub mod timing;
pub mod types;
pub mod unchanging;
pub mod vehicle;
pub mod vessel;
pub mod virtue;

use crate::error::{DiagnosticsError, Result};
use crate::knowledge::{Hexagram, KnowledgeBase, Trigram};
use crate::profile::{ProfileRole, ProfileSet};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use types::DiagnosticRecord;

/// The twenty analysis methods, in canonical execution order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisMethod {
    GreatTheme,
    InternalExternalInversion,
    TrigramResonance,
    LineCorrespondence,
    FiveElementCycles,
    NuclearHexagram,
    InvertedHexagram,
    FlippedHexagram,
    ChangingHexagram,
    SeasonalMismatch,
    RulerMinisterAlignment,
    ComingGoing,
    TimelyModeration,
    RitualOracle,
    FamilyDynamics,
    Vehicle,
    Vessel,
    Virtue,
    SymbolicAnimals,
    Unchanging,
}

use AnalysisMethod::*;

const ESSENTIAL: [AnalysisMethod; 3] = [GreatTheme, InternalExternalInversion, TrigramResonance];

const STANDARD: [AnalysisMethod; 8] = [
    GreatTheme,
    InternalExternalInversion,
    TrigramResonance,
    LineCorrespondence,
    FiveElementCycles,
    NuclearHexagram,
    ChangingHexagram,
    SeasonalMismatch,
];

impl AnalysisMethod {
    pub const ALL: [AnalysisMethod; 20] = [
        GreatTheme,
        InternalExternalInversion,
        TrigramResonance,
        LineCorrespondence,
        FiveElementCycles,
        NuclearHexagram,
        InvertedHexagram,
        FlippedHexagram,
        ChangingHexagram,
        SeasonalMismatch,
        RulerMinisterAlignment,
        ComingGoing,
        TimelyModeration,
        RitualOracle,
        FamilyDynamics,
        Vehicle,
        Vessel,
        Virtue,
        SymbolicAnimals,
        Unchanging,
    ];

    /// Wire tag, identical to the serde name.
    pub fn tag(self) -> &'static str {
        match self {
            GreatTheme => "greatTheme",
            InternalExternalInversion => "internalExternalInversion",
            TrigramResonance => "trigramResonance",
            LineCorrespondence => "lineCorrespondence",
            FiveElementCycles => "fiveElementCycles",
            NuclearHexagram => "nuclearHexagram",
            InvertedHexagram => "invertedHexagram",
            FlippedHexagram => "flippedHexagram",
            ChangingHexagram => "changingHexagram",
            SeasonalMismatch => "seasonalMismatch",
            RulerMinisterAlignment => "rulerMinisterAlignment",
            ComingGoing => "comingGoing",
            TimelyModeration => "timelyModeration",
            RitualOracle => "ritualOracle",
            FamilyDynamics => "familyDynamics",
            Vehicle => "vehicle",
            Vessel => "vessel",
            Virtue => "virtue",
            SymbolicAnimals => "symbolicAnimals",
            Unchanging => "unchanging",
        }
    }
}

impl fmt::Display for AnalysisMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Depth of a run. Each level's methods are a strict superset of the previous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisLevel {
    Essential,
    Standard,
    Comprehensive,
}

impl AnalysisLevel {
    pub const ALL: [AnalysisLevel; 3] = [
        AnalysisLevel::Essential,
        AnalysisLevel::Standard,
        AnalysisLevel::Comprehensive,
    ];

    pub fn methods(self) -> &'static [AnalysisMethod] {
        match self {
            AnalysisLevel::Essential => &ESSENTIAL,
            AnalysisLevel::Standard => &STANDARD,
            AnalysisLevel::Comprehensive => &AnalysisMethod::ALL,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisLevel::Essential => "essential",
            AnalysisLevel::Standard => "standard",
            AnalysisLevel::Comprehensive => "comprehensive",
        }
    }
}

impl fmt::Display for AnalysisLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisLevel {
    type Err = DiagnosticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "essential" => Ok(AnalysisLevel::Essential),
            "standard" => Ok(AnalysisLevel::Standard),
            "comprehensive" => Ok(AnalysisLevel::Comprehensive),
            other => Err(DiagnosticsError::InvalidConfiguration {
                message: format!(
                    "unknown analysis level '{other}' (expected essential, standard or comprehensive)"
                ),
            }),
        }
    }
}

pub(crate) const ROLES: [ProfileRole; 3] = [
    ProfileRole::Engine,
    ProfileRole::Interface,
    ProfileRole::SafeMode,
];

/// The three profile pairings, in the order analyzers report them.
pub(crate) const PAIRS: [(ProfileRole, ProfileRole); 3] = [
    (ProfileRole::Engine, ProfileRole::Interface),
    (ProfileRole::Interface, ProfileRole::SafeMode),
    (ProfileRole::Engine, ProfileRole::SafeMode),
];

/// Everything an analyzer may read: the shared tables and the sanitized triple.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    kb: Arc<KnowledgeBase>,
    profiles: ProfileSet,
}

impl AnalysisContext {
    pub fn new(kb: Arc<KnowledgeBase>, profiles: &ProfileSet) -> Self {
        Self {
            kb,
            profiles: profiles.sanitized(),
        }
    }

    pub fn kb(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn profiles(&self) -> &ProfileSet {
        &self.profiles
    }

    pub fn hexagram(&self, role: ProfileRole) -> &Hexagram {
        let id = match role {
            ProfileRole::Engine => self.profiles.engine.hexagram_id,
            ProfileRole::Interface => self.profiles.interface.hexagram_id,
            ProfileRole::SafeMode => self.profiles.safe_mode.hexagram_id,
        };
        self.kb.hexagram_or_default(id)
    }

    /// (role, hexagram) in engine, interface, safe-mode order.
    pub fn hexagrams(&self) -> [(ProfileRole, &Hexagram); 3] {
        ROLES.map(|r| (r, self.hexagram(r)))
    }

    pub fn upper(&self, role: ProfileRole) -> &Trigram {
        self.kb.upper_of(self.hexagram(role))
    }

    pub fn lower(&self, role: ProfileRole) -> &Trigram {
        self.kb.lower_of(self.hexagram(role))
    }
}

pub trait Analyzer: Send + Sync {
    fn method(&self) -> AnalysisMethod;
    fn analyze(&self, ctx: &AnalysisContext) -> Result<DiagnosticRecord>;
}

static ANALYZERS: Lazy<BTreeMap<AnalysisMethod, Arc<dyn Analyzer>>> = Lazy::new(|| {
    let all: Vec<Arc<dyn Analyzer>> = vec![
        Arc::new(theme::GreatTheme),
        Arc::new(inversion::InternalExternalInversion),
        Arc::new(resonance::TrigramResonance),
        Arc::new(lines::LineCorrespondence),
        Arc::new(elements::FiveElementCycles),
        Arc::new(nuclear::NuclearHexagram),
        Arc::new(inverted::InvertedHexagram),
        Arc::new(flipped::FlippedHexagram),
        Arc::new(changing::ChangingHexagram),
        Arc::new(seasons::SeasonalMismatch),
        Arc::new(ruler::RulerMinisterAlignment),
        Arc::new(circulation::ComingGoing),
        Arc::new(timing::TimelyModeration),
        Arc::new(oracle::RitualOracle),
        Arc::new(family::FamilyDynamics),
        Arc::new(vehicle::Vehicle),
        Arc::new(vessel::Vessel),
        Arc::new(virtue::Virtue),
        Arc::new(animals::SymbolicAnimals),
        Arc::new(unchanging::Unchanging),
    ];
    all.into_iter().map(|a| (a.method(), a)).collect()
});

/// Method → analyzer lookup. Cloning is cheap; individual entries can be
/// swapped out (counting or failing stubs in tests, host extensions).
#[derive(Clone)]
pub struct AnalyzerRegistry {
    analyzers: BTreeMap<AnalysisMethod, Arc<dyn Analyzer>>,
}

impl AnalyzerRegistry {
    pub fn canonical() -> Self {
        Self {
            analyzers: ANALYZERS.clone(),
        }
    }

    pub fn with_analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.analyzers.insert(analyzer.method(), analyzer);
        self
    }

    pub fn get(&self, method: AnalysisMethod) -> Result<Arc<dyn Analyzer>> {
        self.analyzers
            .get(&method)
            .cloned()
            .ok_or_else(|| DiagnosticsError::analyzer(method.tag(), "no analyzer registered"))
    }

    pub fn run(&self, method: AnalysisMethod, ctx: &AnalysisContext) -> Result<DiagnosticRecord> {
        self.get(method)?.analyze(ctx)
    }

    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }
}

impl Default for AnalyzerRegistry {
    fn default() -> Self {
        Self::canonical()
    }
}

impl fmt::Debug for AnalyzerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerRegistry")
            .field("methods", &self.analyzers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// "Qian (乾為天, #1)"
pub(crate) fn label(h: &Hexagram) -> String {
    format!("{} ({}, #{})", h.name, h.symbol, h.id)
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Analyzers push their two unconditional lines first, then optional ones;
/// anything past four is dropped.
pub(crate) fn manifestations(items: Vec<String>) -> Vec<String> {
    items.into_iter().take(4).collect()
}

/// Rounded to 3 decimals so serialized scores stay readable.
pub(crate) fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn ctx(engine: u32, interface: u32, safe_mode: u32) -> AnalysisContext {
        AnalysisContext::new(
            KnowledgeBase::shared(),
            &ProfileSet::from_ids(engine, interface, safe_mode),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn level_method_counts_form_a_subset_chain() {
        let e = AnalysisLevel::Essential.methods();
        let s = AnalysisLevel::Standard.methods();
        let c = AnalysisLevel::Comprehensive.methods();
        assert_eq!((e.len(), s.len(), c.len()), (3, 8, 20));
        let s_set: HashSet<_> = s.iter().collect();
        let c_set: HashSet<_> = c.iter().collect();
        assert!(e.iter().all(|m| s_set.contains(m)));
        assert!(s.iter().all(|m| c_set.contains(m)));
        assert_eq!(c_set.len(), 20);
    }

    #[test]
    fn tags_match_serde_names() {
        for m in AnalysisMethod::ALL {
            let json = serde_json::to_string(&m).unwrap();
            assert_eq!(json, format!("\"{}\"", m.tag()));
        }
    }

    #[test]
    fn level_parsing_is_case_insensitive_and_strict() {
        assert_eq!(
            " Comprehensive ".parse::<AnalysisLevel>().unwrap(),
            AnalysisLevel::Comprehensive
        );
        let err = "deep".parse::<AnalysisLevel>().unwrap_err();
        assert_eq!(err.kind(), "invalid_configuration");
    }

    #[test]
    fn registry_covers_every_method_once() {
        let registry = AnalyzerRegistry::canonical();
        assert_eq!(registry.len(), 20);
        for m in AnalysisMethod::ALL {
            assert_eq!(registry.get(m).unwrap().method(), m);
        }
    }

    #[test]
    fn every_analyzer_succeeds_over_sampled_inputs() {
        let registry = AnalyzerRegistry::canonical();
        for (e, i, s) in [(1, 2, 11), (1, 1, 1), (63, 64, 29), (17, 42, 50), (2, 2, 2)] {
            let ctx = test_support::ctx(e, i, s);
            for m in AnalysisMethod::ALL {
                let record = registry.run(m, &ctx).unwrap();
                assert_eq!(record.method, m);
                assert!(!record.fallback);
                assert!(!record.diagnosis.is_empty());
                assert!(
                    (2..=4).contains(&record.manifestations.len()),
                    "{m} produced {} manifestations",
                    record.manifestations.len()
                );
            }
        }
    }

    #[test]
    fn analyzers_are_deterministic() {
        let registry = AnalyzerRegistry::canonical();
        let ctx = test_support::ctx(12, 35, 47);
        for m in AnalysisMethod::ALL {
            let a = serde_json::to_value(registry.run(m, &ctx).unwrap()).unwrap();
            let b = serde_json::to_value(registry.run(m, &ctx).unwrap()).unwrap();
            assert_eq!(a, b);
        }
    }
}
