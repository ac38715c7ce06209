//! End-to-end scenarios over known profile triples.

use hexagram_diagnostics::analyzers::inversion::InversionKind;
use hexagram_diagnostics::analyzers::theme::ThemePattern;
use hexagram_diagnostics::{
    AnalysisLevel, AnalysisMethod, Config, Orchestrator, ProfileRole, ProfileSet, ResultLevel,
    Severity,
};

async fn run(e: u32, i: u32, s: u32, level: AnalysisLevel) -> hexagram_diagnostics::AnalysisBatchResult {
    Orchestrator::new(&Config::default())
        .analyze(&ProfileSet::from_ids(e, i, s), level, None)
        .await
}

#[tokio::test]
async fn heaven_earth_peace_reverses_and_generates() {
    let result = run(1, 2, 11, AnalysisLevel::Standard).await;
    assert!(!result.fallback && !result.error);

    let inversion = result.records[&AnalysisMethod::InternalExternalInversion]
        .inversion()
        .unwrap();
    assert_eq!(
        inversion.pair(ProfileRole::Engine, ProfileRole::Interface),
        Some(InversionKind::FullReversal)
    );
    assert_eq!(inversion.severity, Severity::High);

    let elements = result.records[&AnalysisMethod::FiveElementCycles]
        .elements()
        .unwrap();
    let link = &elements.links[0];
    assert_eq!((link.from, link.to), (ProfileRole::Engine, ProfileRole::Interface));
    assert_eq!(link.from_element.as_str(), "metal");
    assert_eq!(link.to_element.as_str(), "earth");
    assert!(link.relation.is_generative());

    assert!(
        result
            .integrated_insights
            .warning_signals
            .iter()
            .any(|w| w == "burnout risk")
    );
}

#[tokio::test]
async fn triple_heaven_is_fully_unified() {
    let result = run(1, 1, 1, AnalysisLevel::Essential).await;
    assert_eq!(result.analysis_level, ResultLevel::Essential);
    assert_eq!(result.records.len(), 3);

    let resonance = result.records[&AnalysisMethod::TrigramResonance]
        .resonance()
        .unwrap();
    assert_eq!(resonance.resonant.len(), 1);
    assert_eq!(resonance.resonant[0].id, 1);
    assert_eq!(resonance.resonant[0].count, 6);

    let theme = result.records[&AnalysisMethod::GreatTheme].theme().unwrap();
    assert_eq!(theme.pattern, ThemePattern::FullyUnified);
    assert!(result.records[&AnalysisMethod::GreatTheme]
        .diagnosis
        .contains("fully unified"));
}

#[tokio::test]
async fn comprehensive_result_serializes_every_method_tag() {
    let result = run(17, 42, 50, AnalysisLevel::Comprehensive).await;
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["analysisLevel"], "comprehensive");
    let records = json["records"].as_object().unwrap();
    assert_eq!(records.len(), 20);
    for method in AnalysisMethod::ALL {
        let record = &records[method.tag()];
        assert_eq!(record["type"], method.tag());
        assert_eq!(record["fallback"], false);
        assert_eq!(record["confidence"], 1.0);
        assert!(record["computedData"]["kind"].is_string());
    }
    for score in ["harmonyScore", "complexityScore", "potentialScore", "riskScore"] {
        let v = json["overallAssessment"][score].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&v), "{score} = {v}");
    }
}

#[tokio::test]
async fn invalid_profiles_are_sanitized_before_analysis() {
    let a = run(0, 99, 2, AnalysisLevel::Essential).await;
    let b = run(1, 1, 2, AnalysisLevel::Essential).await;
    assert_eq!(
        serde_json::to_value(&a.records).unwrap(),
        serde_json::to_value(&b.records).unwrap()
    );
}
