//! Diagnostic orchestrator: picks the methods for a level, runs them in
//! bounded concurrent batches, caches complete results and degrades to an
//! essential-only run when anything outside a single analyzer goes wrong.

pub mod cache;
pub mod result;

use crate::analyzers::types::DiagnosticRecord;
use crate::analyzers::{AnalysisContext, AnalysisLevel, AnalysisMethod, AnalyzerRegistry};
use crate::config::{CacheConfig, Config, OrchestratorConfig};
use crate::error::{DiagnosticsError, Result};
use crate::knowledge::KnowledgeBase;
use crate::profile::ProfileSet;
use crate::synthesis::{self, InsightSynthesizer, RecordMap, Synthesizer};
use cache::{AnalysisCache, CacheKey, CacheStats, Clock, SystemClock};
use futures_util::future::join_all;
use result::{AnalysisBatchResult, ResultLevel};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Confidence reported for an essential-only fallback run.
pub const FALLBACK_CONFIDENCE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Idle,
    CacheLookup,
    Batching,
    Synthesizing,
    Done,
    Fallback,
}

impl fmt::Display for OrchestratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrchestratorState::Idle => "idle",
            OrchestratorState::CacheLookup => "cache_lookup",
            OrchestratorState::Batching => "batching",
            OrchestratorState::Synthesizing => "synthesizing",
            OrchestratorState::Done => "done",
            OrchestratorState::Fallback => "fallback",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStage {
    Initialization,
    Analysis,
    Completion,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisProgress {
    pub stage: ProgressStage,
    pub completed: usize,
    pub total: usize,
    /// 1-based batch number for `analysis` events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<usize>,
    pub methods: Vec<AnalysisMethod>,
    pub message: String,
}

impl AnalysisProgress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.completed * 100) / self.total).min(100) as u8
    }
}

/// Progress observer passed to [`Orchestrator::analyze`].
pub type ProgressFn<'a> = &'a (dyn Fn(&AnalysisProgress) + Send + Sync);

fn emit(on_progress: Option<ProgressFn<'_>>, event: AnalysisProgress) {
    debug!(
        "progress {:?} {}/{}: {}",
        event.stage, event.completed, event.total, event.message
    );
    if let Some(callback) = on_progress {
        callback(&event);
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

pub struct Orchestrator {
    kb: Arc<KnowledgeBase>,
    registry: AnalyzerRegistry,
    synthesizer: Arc<dyn Synthesizer>,
    cache: Mutex<AnalysisCache>,
    /// One gate per key being computed; later callers queue on it and then
    /// find the first caller's result in the cache.
    inflight: Mutex<HashMap<CacheKey, Arc<Mutex<()>>>>,
    cache_settings: CacheConfig,
    settings: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(config: &Config) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
        Self {
            kb: KnowledgeBase::shared(),
            registry: AnalyzerRegistry::canonical(),
            synthesizer: Arc::new(InsightSynthesizer),
            cache: Mutex::new(Self::build_cache(&config.cache, clock)),
            inflight: Mutex::new(HashMap::new()),
            cache_settings: config.cache.clone(),
            settings: config.orchestrator.clone(),
        }
    }

    fn build_cache(settings: &CacheConfig, clock: Arc<dyn Clock>) -> AnalysisCache {
        AnalysisCache::new(
            settings.max_entries,
            settings.ttl(),
            settings.sweep_interval(),
            clock,
        )
    }

    pub fn with_registry(mut self, registry: AnalyzerRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn Synthesizer>) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    /// Replaces the cache (dropping its contents) with one driven by `clock`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.cache = Mutex::new(Self::build_cache(&self.cache_settings, clock));
        self
    }

    pub fn with_knowledge(mut self, kb: Arc<KnowledgeBase>) -> Self {
        self.kb = kb;
        self
    }

    pub fn knowledge(&self) -> &Arc<KnowledgeBase> {
        &self.kb
    }

    pub fn analyzer_timeout(&self) -> Duration {
        self.settings.analyzer_timeout()
    }

    fn transition(&self, state: OrchestratorState, key: &CacheKey) {
        debug!("orchestrator [{}] -> {}", key, state);
    }

    /// Parses `level` first; an unknown level fails before any work is done.
    pub async fn analyze_named(
        &self,
        profiles: &ProfileSet,
        level: &str,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<AnalysisBatchResult> {
        let level: AnalysisLevel = level.parse()?;
        Ok(self.analyze(profiles, level, on_progress).await)
    }

    /// Never fails: analyzer problems become substitute records, anything else
    /// degrades to the essential-only fallback, and a failed fallback is
    /// reported through the `error` flag. Concurrent calls for one key run
    /// one after another, so a cacheable result is computed only once.
    pub async fn analyze(
        &self,
        profiles: &ProfileSet,
        level: AnalysisLevel,
        on_progress: Option<ProgressFn<'_>>,
    ) -> AnalysisBatchResult {
        let started = Instant::now();
        let profiles = profiles.sanitized();
        let key = CacheKey::new(&profiles, level);
        self.transition(OrchestratorState::Idle, &key);

        let gate = self.gate(key).await;
        let result = {
            let _turn = gate.lock().await;
            self.analyze_key(key, &profiles, level, on_progress, started)
                .await
        };
        self.release(&key, gate).await;
        result
    }

    async fn gate(&self, key: CacheKey) -> Arc<Mutex<()>> {
        self.inflight.lock().await.entry(key).or_default().clone()
    }

    /// Drops the key's gate once no other caller holds it.
    async fn release(&self, key: &CacheKey, gate: Arc<Mutex<()>>) {
        let mut inflight = self.inflight.lock().await;
        drop(gate);
        if inflight.get(key).is_some_and(|g| Arc::strong_count(g) == 1) {
            inflight.remove(key);
        }
    }

    async fn analyze_key(
        &self,
        key: CacheKey,
        profiles: &ProfileSet,
        level: AnalysisLevel,
        on_progress: Option<ProgressFn<'_>>,
        started: Instant,
    ) -> AnalysisBatchResult {
        self.transition(OrchestratorState::CacheLookup, &key);
        let cached = self.cache.lock().await.get(&key);
        if let Some(hit) = cached {
            debug!("cache hit for {}", key);
            let total = hit.records.len();
            emit(
                on_progress,
                AnalysisProgress {
                    stage: ProgressStage::Completion,
                    completed: total,
                    total,
                    batch: None,
                    methods: Vec::new(),
                    message: "served from cache".to_string(),
                },
            );
            self.transition(OrchestratorState::Done, &key);
            return hit;
        }

        match self.run(&key, profiles, level, on_progress, started).await {
            Ok(result) => {
                let substituted = result.substituted();
                if !substituted.is_empty() {
                    warn!(
                        "analysis {} completed with {} substitute record(s)",
                        key,
                        substituted.len()
                    );
                }
                if result.is_cacheable() {
                    self.cache.lock().await.insert(key, result.clone());
                }
                info!(
                    "analysis {} completed in {}ms ({} records)",
                    key,
                    result.processing_time_ms,
                    result.records.len()
                );
                self.transition(OrchestratorState::Done, &key);
                result
            }
            Err(err) => {
                warn!("analysis {} failed ({}); running essential fallback", key, err);
                self.transition(OrchestratorState::Fallback, &key);
                let result = self.fallback(profiles, &err, started).await;
                if !result.error {
                    emit(
                        on_progress,
                        AnalysisProgress {
                            stage: ProgressStage::Completion,
                            completed: result.records.len(),
                            total: result.records.len(),
                            batch: None,
                            methods: Vec::new(),
                            message: "completed with essential fallback".to_string(),
                        },
                    );
                }
                self.transition(OrchestratorState::Done, &key);
                result
            }
        }
    }

    async fn run(
        &self,
        key: &CacheKey,
        profiles: &ProfileSet,
        level: AnalysisLevel,
        on_progress: Option<ProgressFn<'_>>,
        started: Instant,
    ) -> Result<AnalysisBatchResult> {
        let ctx = Arc::new(AnalysisContext::new(self.kb.clone(), profiles));
        let methods = level.methods();
        let total = methods.len();
        let batch_size = self.settings.batch_size(level).max(1);

        emit(
            on_progress,
            AnalysisProgress {
                stage: ProgressStage::Initialization,
                completed: 0,
                total,
                batch: None,
                methods: methods.to_vec(),
                message: format!("starting {level} analysis"),
            },
        );

        self.transition(OrchestratorState::Batching, key);
        let mut records = RecordMap::new();
        for (index, batch) in methods.chunks(batch_size).enumerate() {
            let outcomes = join_all(batch.iter().map(|&m| self.run_method(m, ctx.clone()))).await;
            for record in outcomes {
                records.insert(record.method, record);
            }
            debug!(
                "batch {} of {} finished ({}/{})",
                index + 1,
                key,
                records.len(),
                total
            );
            emit(
                on_progress,
                AnalysisProgress {
                    stage: ProgressStage::Analysis,
                    completed: records.len(),
                    total,
                    batch: Some(index + 1),
                    methods: batch.to_vec(),
                    message: format!("batch {} complete", index + 1),
                },
            );
        }

        self.transition(OrchestratorState::Synthesizing, key);
        let synthesizer = self.synthesizer.clone();
        let (records, synthesis) = tokio::task::spawn_blocking(move || {
            let synthesis = synthesizer.synthesize(&records);
            (records, synthesis)
        })
        .await
        .map_err(|_| DiagnosticsError::OrchestrationFailure {
            message: "synthesizer panicked".to_string(),
        })?;
        let synthesis = synthesis.map_err(|e| DiagnosticsError::OrchestrationFailure {
            message: format!("synthesis failed: {e}"),
        })?;

        emit(
            on_progress,
            AnalysisProgress {
                stage: ProgressStage::Completion,
                completed: records.len(),
                total,
                batch: None,
                methods: Vec::new(),
                message: format!("{level} analysis complete"),
            },
        );

        Ok(AnalysisBatchResult::completed(
            records,
            synthesis,
            level,
            elapsed_ms(started),
        ))
    }

    /// One analyzer on the blocking pool behind the configured timeout. Every
    /// failure mode yields the substitute record.
    async fn run_method(&self, method: AnalysisMethod, ctx: Arc<AnalysisContext>) -> DiagnosticRecord {
        let analyzer = match self.registry.get(method) {
            Ok(analyzer) => analyzer,
            Err(e) => {
                warn!("{}", e);
                return DiagnosticRecord::unavailable(method);
            }
        };

        let timeout = self.settings.analyzer_timeout();
        let task = tokio::task::spawn_blocking(move || analyzer.analyze(&ctx));
        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(Ok(record))) => record,
            Ok(Ok(Err(e))) => {
                warn!("Analyzer {} failed: {}", method, e);
                DiagnosticRecord::unavailable(method)
            }
            Ok(Err(join_err)) => {
                warn!("Analyzer {} panicked: {}", method, join_err);
                DiagnosticRecord::unavailable(method)
            }
            Err(_) => {
                let err = DiagnosticsError::Timeout {
                    operation: format!("analyzer {method}"),
                    timeout_ms: timeout.as_millis() as u64,
                };
                warn!("{}", err);
                DiagnosticRecord::unavailable(method)
            }
        }
    }

    /// Essential methods in sequence with the built-in synthesizer. Any
    /// failure here is total.
    async fn fallback(
        &self,
        profiles: &ProfileSet,
        cause: &DiagnosticsError,
        started: Instant,
    ) -> AnalysisBatchResult {
        let ctx = AnalysisContext::new(self.kb.clone(), profiles);
        let registry = self.registry.clone();
        let outcome = tokio::task::spawn_blocking(move || -> Result<_> {
            let records = AnalysisLevel::Essential
                .methods()
                .iter()
                .map(|&m| registry.run(m, &ctx).map(|r| (m, r)))
                .collect::<Result<RecordMap>>()?;
            let synthesis = synthesis::synthesize(&records);
            Ok((records, synthesis))
        })
        .await;

        let failure = match outcome {
            Ok(Ok((records, mut synthesis))) => {
                synthesis.assessment.confidence = FALLBACK_CONFIDENCE;
                synthesis.assessment.summary = Some(format!(
                    "Essential analysis only: {}",
                    cause
                ));
                return AnalysisBatchResult {
                    records,
                    integrated_insights: synthesis.insights,
                    overall_assessment: synthesis.assessment,
                    analysis_level: ResultLevel::Basic,
                    processing_time_ms: elapsed_ms(started),
                    fallback: true,
                    error: false,
                };
            }
            Ok(Err(e)) => e.to_string(),
            Err(join_err) => format!("fallback panicked: {join_err}"),
        };

        let err = DiagnosticsError::TotalFailure {
            message: format!("{cause}; {failure}"),
        };
        error!("{}", err);
        AnalysisBatchResult::failed(err.to_string(), elapsed_ms(started))
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.lock().await.stats()
    }

    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("registry", &self.registry)
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    #[tokio::test]
    async fn standard_run_reports_batches_in_order() {
        let orchestrator = Orchestrator::new(&Config::default());
        let events = StdMutex::new(Vec::new());
        let record = |p: &AnalysisProgress| {
            events
                .lock()
                .unwrap()
                .push((p.stage, p.completed, p.batch));
        };

        let result = orchestrator
            .analyze(
                &ProfileSet::from_ids(1, 2, 11),
                AnalysisLevel::Standard,
                Some(&record),
            )
            .await;

        assert!(!result.fallback && !result.error);
        assert_eq!(result.analysis_level, ResultLevel::Standard);
        let methods: Vec<_> = result.records.keys().copied().collect();
        assert_eq!(methods, AnalysisLevel::Standard.methods());

        let events = events.into_inner().unwrap();
        assert_eq!(
            events,
            vec![
                (ProgressStage::Initialization, 0, None),
                (ProgressStage::Analysis, 3, Some(1)),
                (ProgressStage::Analysis, 6, Some(2)),
                (ProgressStage::Analysis, 8, Some(3)),
                (ProgressStage::Completion, 8, None),
            ]
        );
    }

    #[tokio::test]
    async fn comprehensive_run_uses_wider_batches() {
        let orchestrator = Orchestrator::new(&Config::default());
        let batches = StdMutex::new(Vec::new());
        let record = |p: &AnalysisProgress| {
            if p.stage == ProgressStage::Analysis {
                batches.lock().unwrap().push(p.methods.len());
            }
        };
        let result = orchestrator
            .analyze(
                &ProfileSet::from_ids(17, 42, 50),
                AnalysisLevel::Comprehensive,
                Some(&record),
            )
            .await;
        assert_eq!(result.records.len(), 20);
        assert_eq!(batches.into_inner().unwrap(), vec![5, 5, 5, 5]);
    }

    #[test]
    fn progress_percent_is_bounded() {
        let p = AnalysisProgress {
            stage: ProgressStage::Analysis,
            completed: 3,
            total: 8,
            batch: Some(1),
            methods: Vec::new(),
            message: String::new(),
        };
        assert_eq!(p.percent(), 37);
    }
}
