//! Seasonal fit of each profile and mismatches between them.

use super::types::{DiagnosticRecord, Findings, Severity};
use super::{AnalysisContext, AnalysisMethod, Analyzer, PAIRS, ROLES, manifestations};
use crate::error::Result;
use crate::knowledge::{Season, SeasonInfo};
use crate::profile::ProfileRole;
use serde::Serialize;
use std::collections::BTreeSet;

pub struct SeasonalMismatch;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonOpposition {
    pub between: [ProfileRole; 2],
    pub seasons: [Season; 2],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonFindings {
    pub seasons: [SeasonInfo; 3],
    pub distinct_seasons: usize,
    pub oppositions: Vec<SeasonOpposition>,
    pub mismatch: Severity,
}

fn season_mood(season: Season) -> &'static str {
    match season {
        Season::Spring => "starting things",
        Season::Summer => "expanding and showing",
        Season::Autumn => "harvesting and judging",
        Season::Winter => "conserving and waiting",
    }
}

impl Analyzer for SeasonalMismatch {
    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::SeasonalMismatch
    }

    fn analyze(&self, ctx: &AnalysisContext) -> Result<DiagnosticRecord> {
        let seasons = ROLES.map(|r| ctx.hexagram(r).season);
        let season_of = |role: ProfileRole| ctx.hexagram(role).season.season;
        let distinct_seasons = seasons
            .iter()
            .map(|s| s.season)
            .collect::<BTreeSet<_>>()
            .len();

        let oppositions: Vec<SeasonOpposition> = PAIRS
            .iter()
            .filter(|(a, b)| season_of(*a).opposite() == season_of(*b))
            .map(|&(a, b)| SeasonOpposition {
                between: [a, b],
                seasons: [season_of(a), season_of(b)],
            })
            .collect();

        let mismatch = if !oppositions.is_empty() {
            Severity::High
        } else if distinct_seasons > 1 {
            Severity::Medium
        } else {
            Severity::Low
        };

        let diagnosis = match mismatch {
            Severity::High => format!(
                "{} and {} live in opposite seasons; their timing pulls in contrary directions.",
                oppositions[0].between[0], oppositions[0].between[1]
            ),
            Severity::Medium => format!(
                "The profiles span {distinct_seasons} seasons; pacing differs between contexts."
            ),
            Severity::Low => format!(
                "All profiles share {}: one natural rhythm of {}.",
                seasons[0].season.as_str(),
                season_mood(seasons[0].season)
            ),
        };

        let mut items = vec![
            format!(
                "Engine in {}, Interface in {}, Safe Mode in {}",
                seasons[0].season.as_str(),
                seasons[1].season.as_str(),
                seasons[2].season.as_str()
            ),
            format!("The Engine is most at ease {}", season_mood(seasons[0].season)),
        ];
        items.extend(oppositions.iter().map(|o| {
            format!(
                "{} ({}) clashes with {} ({})",
                o.between[0],
                o.seasons[0].as_str(),
                o.between[1],
                o.seasons[1].as_str()
            )
        }));

        Ok(DiagnosticRecord::computed(
            self.method(),
            Findings::Seasons(SeasonFindings {
                seasons,
                distinct_seasons,
                oppositions,
                mismatch,
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

    fn findings(e: u32, i: u32, s: u32) -> SeasonFindings {
        match SeasonalMismatch.analyze(&ctx(e, i, s)).unwrap().computed_data {
            Some(Findings::Seasons(f)) => f,
            other => panic!("unexpected findings {other:?}"),
        }
    }

    #[test]
    fn summer_and_winter_sovereigns_oppose() {
        // heaven is the fifth-month sovereign, earth the eleventh
        let f = findings(1, 2, 11);
        assert_eq!(f.seasons[0].season, Season::Summer);
        assert_eq!(f.seasons[1].season, Season::Winter);
        assert_eq!(f.mismatch, Severity::High);
        assert_eq!(f.oppositions[0].between, [ProfileRole::Engine, ProfileRole::Interface]);
    }

    #[test]
    fn shared_season_is_low_mismatch() {
        let f = findings(11, 34, 43);
        assert_eq!(f.distinct_seasons, 1);
        assert_eq!(f.mismatch, Severity::Low);
    }
}
