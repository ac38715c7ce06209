//! Timely moderation: sensitivity to timing, from season confidence,
//! timing-themed judgments and the half of the sequence a hexagram sits in.

use super::types::{DiagnosticRecord, Findings};
use super::{AnalysisContext, AnalysisMethod, Analyzer, ROLES, manifestations, mean, round3};
use crate::error::Result;
use crate::knowledge::{HexagramId, SeasonConfidence};
use crate::profile::ProfileRole;
use serde::Serialize;

pub struct TimelyModeration;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingProfile {
    pub role: ProfileRole,
    pub hexagram_id: HexagramId,
    pub season_confidence: SeasonConfidence,
    pub timing_sensitive: bool,
    pub upper_canon: bool,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingFindings {
    pub profiles: Vec<TimingProfile>,
    pub moderation_score: f64,
}

impl Analyzer for TimelyModeration {
    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::TimelyModeration
    }

    fn analyze(&self, ctx: &AnalysisContext) -> Result<DiagnosticRecord> {
        let profiles: Vec<TimingProfile> = ROLES
            .iter()
            .map(|&role| {
                let h = ctx.hexagram(role);
                let seasonal = match h.season.confidence {
                    SeasonConfidence::High => 0.8,
                    SeasonConfidence::Medium => 0.6,
                };
                let timing_sensitive = h.has_keyword("timing");
                let contextual = if timing_sensitive { 0.8 } else { 0.5 };
                // the upper canon deals with natural order, the lower with human affairs
                let canon = if h.upper_canon() { 0.6 } else { 0.7 };
                TimingProfile {
                    role,
                    hexagram_id: h.id,
                    season_confidence: h.season.confidence,
                    timing_sensitive,
                    upper_canon: h.upper_canon(),
                    score: round3(mean(&[seasonal, contextual, canon])),
                }
            })
            .collect();

        let scores: Vec<f64> = profiles.iter().map(|p| p.score).collect();
        let moderation_score = mean(&scores);
        let sensitive: Vec<&TimingProfile> = profiles.iter().filter(|p| p.timing_sensitive).collect();

        let diagnosis = if moderation_score >= 0.7 {
            "Strong sense of timing: the person knows when to advance and when to hold back."
                .to_string()
        } else if sensitive.is_empty() {
            "Timing is not a natural strength; pacing has to come from outside cues.".to_string()
        } else {
            format!(
                "Timing sense is situational, strongest in the {} profile.",
                sensitive[0].role
            )
        };

        let mut items = vec![
            format!("Moderation score {:.2}", moderation_score),
            match profiles.iter().max_by(|a, b| a.score.total_cmp(&b.score)) {
                Some(best) => format!("Best timed in {}", best.role),
                None => "No profile stands out in timing".to_string(),
            },
        ];
        items.extend(
            sensitive
                .iter()
                .map(|p| format!("{} reads the moment before acting", p.role)),
        );

        Ok(DiagnosticRecord::computed(
            self.method(),
            Findings::Timing(TimingFindings {
                profiles,
                moderation_score: round3(moderation_score),
            }),
            diagnosis,
            manifestations(items),
        ))
    }
}
