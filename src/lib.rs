pub mod analyzers;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod orchestrator;
pub mod profile;
pub mod synthesis;
pub mod transform;

pub use analyzers::types::{DiagnosticRecord, Findings, Severity};
pub use analyzers::{AnalysisContext, AnalysisLevel, AnalysisMethod, Analyzer, AnalyzerRegistry};
pub use config::Config;
pub use error::{DiagnosticsError, Result};
pub use knowledge::{Hexagram, HexagramId, KnowledgeBase, Trigram, TrigramId};
pub use orchestrator::cache::{CacheStats, Clock, ManualClock, SystemClock};
pub use orchestrator::result::{AnalysisBatchResult, ResultLevel};
pub use orchestrator::{AnalysisProgress, Orchestrator, ProgressStage};
pub use profile::{OsProfile, ProfileRole, ProfileSet};
pub use synthesis::{InsightSynthesizer, IntegratedInsights, OverallAssessment, Synthesis, Synthesizer};
pub use transform::HexagramLines;
