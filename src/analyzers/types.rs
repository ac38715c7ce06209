//! Types for analyzer outputs.

use super::AnalysisMethod;
use super::{
    animals::AnimalFindings, changing::ChangingFindings, circulation::CirculationFindings,
    elements::ElementFindings, family::FamilyFindings, flipped::FlippedFindings,
    inversion::InversionFindings, inverted::InvertedFindings, lines::LineFindings,
    nuclear::NuclearFindings, oracle::OracleFindings, resonance::ResonanceFindings,
    ruler::RulerFindings, seasons::SeasonFindings, theme::ThemeFindings,
    timing::TimingFindings, unchanging::UnchangingFindings, vehicle::VehicleFindings,
    vessel::VesselFindings, virtue::VirtueFindings,
};
use serde::Serialize;

pub const UNAVAILABLE_DIAGNOSIS: &str = "analysis unavailable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Per-analyzer computed values, tagged by `kind` when serialized.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Findings {
    Theme(ThemeFindings),
    Inversion(InversionFindings),
    Resonance(ResonanceFindings),
    Lines(LineFindings),
    Elements(ElementFindings),
    Nuclear(NuclearFindings),
    Inverted(InvertedFindings),
    Flipped(FlippedFindings),
    Changing(ChangingFindings),
    Seasons(SeasonFindings),
    Ruler(RulerFindings),
    Circulation(CirculationFindings),
    Timing(TimingFindings),
    Oracle(OracleFindings),
    Family(FamilyFindings),
    Vehicle(VehicleFindings),
    Vessel(VesselFindings),
    Virtue(VirtueFindings),
    Animals(AnimalFindings),
    Unchanging(UnchangingFindings),
}

/// One analyzer's verdict. Substitute records carry no findings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticRecord {
    #[serde(rename = "type")]
    pub method: AnalysisMethod,
    pub computed_data: Option<Findings>,
    pub diagnosis: String,
    pub manifestations: Vec<String>,
    pub confidence: f64,
    pub fallback: bool,
}

impl DiagnosticRecord {
    pub fn computed(
        method: AnalysisMethod,
        findings: Findings,
        diagnosis: impl Into<String>,
        manifestations: Vec<String>,
    ) -> Self {
        Self {
            method,
            computed_data: Some(findings),
            diagnosis: diagnosis.into(),
            manifestations,
            confidence: 1.0,
            fallback: false,
        }
    }

    /// Stand-in for an analyzer that errored, panicked or timed out.
    pub fn unavailable(method: AnalysisMethod) -> Self {
        Self {
            method,
            computed_data: None,
            diagnosis: UNAVAILABLE_DIAGNOSIS.to_string(),
            manifestations: Vec::new(),
            confidence: 0.5,
            fallback: true,
        }
    }

    pub fn theme(&self) -> Option<&ThemeFindings> {
        match &self.computed_data {
            Some(Findings::Theme(f)) => Some(f),
            _ => None,
        }
    }

    pub fn inversion(&self) -> Option<&InversionFindings> {
        match &self.computed_data {
            Some(Findings::Inversion(f)) => Some(f),
            _ => None,
        }
    }

    pub fn resonance(&self) -> Option<&ResonanceFindings> {
        match &self.computed_data {
            Some(Findings::Resonance(f)) => Some(f),
            _ => None,
        }
    }

    pub fn lines(&self) -> Option<&LineFindings> {
        match &self.computed_data {
            Some(Findings::Lines(f)) => Some(f),
            _ => None,
        }
    }

    pub fn elements(&self) -> Option<&ElementFindings> {
        match &self.computed_data {
            Some(Findings::Elements(f)) => Some(f),
            _ => None,
        }
    }
}
