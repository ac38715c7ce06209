use crate::analyzers::AnalysisLevel;
use crate::synthesis::{IntegratedInsights, OverallAssessment, RecordMap, Synthesis};
use serde::Serialize;

/// Level label carried by a result. `Basic` marks the essential-only
/// fallback run and `Error` a total failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultLevel {
    Essential,
    Standard,
    Comprehensive,
    Basic,
    Error,
}

impl From<AnalysisLevel> for ResultLevel {
    fn from(level: AnalysisLevel) -> Self {
        match level {
            AnalysisLevel::Essential => ResultLevel::Essential,
            AnalysisLevel::Standard => ResultLevel::Standard,
            AnalysisLevel::Comprehensive => ResultLevel::Comprehensive,
        }
    }
}

/// Everything one `analyze` call hands back. Degraded results keep this shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisBatchResult {
    /// Keyed by method; iteration follows the canonical method order.
    pub records: RecordMap,
    pub integrated_insights: IntegratedInsights,
    pub overall_assessment: OverallAssessment,
    pub analysis_level: ResultLevel,
    pub processing_time_ms: u64,
    pub fallback: bool,
    pub error: bool,
}

impl AnalysisBatchResult {
    pub fn completed(
        records: RecordMap,
        synthesis: Synthesis,
        level: AnalysisLevel,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            records,
            integrated_insights: synthesis.insights,
            overall_assessment: synthesis.assessment,
            analysis_level: level.into(),
            processing_time_ms,
            fallback: false,
            error: false,
        }
    }

    pub fn failed(message: impl Into<String>, processing_time_ms: u64) -> Self {
        Self {
            records: RecordMap::new(),
            integrated_insights: IntegratedInsights::default(),
            overall_assessment: OverallAssessment::empty(message),
            analysis_level: ResultLevel::Error,
            processing_time_ms,
            fallback: false,
            error: true,
        }
    }

    /// Only complete results may be cached. A substitute record may stand in
    /// for a transient timeout, so its result is recomputed on the next call.
    pub fn is_cacheable(&self) -> bool {
        !self.fallback && !self.error && self.records.values().all(|r| !r.fallback)
    }

    /// Methods whose record is a substitute.
    pub fn substituted(&self) -> Vec<crate::analyzers::AnalysisMethod> {
        self.records
            .values()
            .filter(|r| r.fallback)
            .map(|r| r.method)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::AnalysisMethod;
    use crate::analyzers::types::DiagnosticRecord;

    #[test]
    fn failed_result_serializes_with_error_flag() {
        let result = AnalysisBatchResult::failed("boom", 3);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error"], true);
        assert_eq!(json["fallback"], false);
        assert_eq!(json["analysisLevel"], "error");
        assert_eq!(json["overallAssessment"]["confidence"], 0.0);
        assert_eq!(json["overallAssessment"]["summary"], "boom");
        assert!(json["records"].as_object().unwrap().is_empty());
        assert!(!result.is_cacheable());
    }

    #[test]
    fn results_with_substitutes_are_not_cacheable() {
        let mut records = RecordMap::new();
        records.insert(
            AnalysisMethod::GreatTheme,
            DiagnosticRecord::unavailable(AnalysisMethod::GreatTheme),
        );
        let synthesis = crate::synthesis::synthesize(&records);
        let result = AnalysisBatchResult::completed(records, synthesis, AnalysisLevel::Essential, 1);
        assert!(!result.fallback && !result.error);
        assert_eq!(result.substituted(), vec![AnalysisMethod::GreatTheme]);
        assert!(!result.is_cacheable());
    }
}
