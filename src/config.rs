use crate::analyzers::AnalysisLevel;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure loaded from hexagram_diagnostics.toml and environment variables
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    pub cache: CacheConfig,
    pub orchestrator: OrchestratorConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Result cache sizing and expiry
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub max_entries: usize,
    pub sweep_interval_secs: u64,
}

/// Level selection, batching and per-analyzer limits
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub default_level: String,
    pub standard_batch_size: usize,
    pub comprehensive_batch_size: usize,
    pub analyzer_timeout_ms: u64,
}

/// Process-level settings that only make sense from the environment
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub log_level: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            max_entries: 100,
            sweep_interval_secs: 60,
        }
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            default_level: "standard".to_string(),
            standard_batch_size: 3,
            comprehensive_batch_size: 5,
            analyzer_timeout_ms: 2000,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "hexagram_diagnostics=info".to_string(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl OrchestratorConfig {
    pub fn analyzer_timeout(&self) -> Duration {
        Duration::from_millis(self.analyzer_timeout_ms)
    }

    pub fn level(&self) -> anyhow::Result<AnalysisLevel> {
        self.default_level
            .parse::<AnalysisLevel>()
            .map_err(|e| anyhow::anyhow!("orchestrator.default_level: {e}"))
    }

    /// Concurrency bound for a level: comprehensive runs use the wider batch.
    pub fn batch_size(&self, level: AnalysisLevel) -> usize {
        match level {
            AnalysisLevel::Comprehensive => self.comprehensive_batch_size,
            AnalysisLevel::Essential | AnalysisLevel::Standard => self.standard_batch_size,
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses HEXDIAG_CONFIG environment variable or defaults to "hexagram_diagnostics.toml"
    pub fn load() -> anyhow::Result<Self> {
        if let Ok(env_path) = std::env::var("HEXDIAG_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::from_path(".env");
        }

        let config_path = std::env::var("HEXDIAG_CONFIG")
            .unwrap_or_else(|_| "hexagram_diagnostics.toml".to_string());

        let mut config: Config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            Self::from_toml(&content)?
        } else {
            tracing::warn!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Env-first overrides. Unparseable numeric values are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Option<T> {
            let raw = raw?;
            match raw.trim().parse::<T>() {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!("Ignoring {}={:?}: not a valid number", key, raw);
                    None
                }
            }
        }

        if let Some(v) = parsed("HEXDIAG_CACHE_TTL_SECS", lookup("HEXDIAG_CACHE_TTL_SECS")) {
            self.cache.ttl_secs = v;
        }
        if let Some(v) = parsed("HEXDIAG_CACHE_MAX", lookup("HEXDIAG_CACHE_MAX")) {
            self.cache.max_entries = v;
        }
        if let Some(v) = parsed("HEXDIAG_CACHE_SWEEP_SECS", lookup("HEXDIAG_CACHE_SWEEP_SECS")) {
            self.cache.sweep_interval_secs = v;
        }
        if let Some(level) = lookup("HEXDIAG_LEVEL") {
            self.orchestrator.default_level = level.trim().to_string();
        }
        if let Some(v) = parsed("HEXDIAG_BATCH_STANDARD", lookup("HEXDIAG_BATCH_STANDARD")) {
            self.orchestrator.standard_batch_size = v;
        }
        if let Some(v) = parsed(
            "HEXDIAG_BATCH_COMPREHENSIVE",
            lookup("HEXDIAG_BATCH_COMPREHENSIVE"),
        ) {
            self.orchestrator.comprehensive_batch_size = v;
        }
        if let Some(v) = parsed(
            "HEXDIAG_ANALYZER_TIMEOUT_MS",
            lookup("HEXDIAG_ANALYZER_TIMEOUT_MS"),
        ) {
            self.orchestrator.analyzer_timeout_ms = v;
        }
        if let Some(filter) = lookup("RUST_LOG") {
            self.runtime.log_level = filter;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.cache.ttl_secs == 0 {
            anyhow::bail!("cache.ttl_secs must be > 0");
        }
        if self.cache.max_entries == 0 {
            anyhow::bail!("cache.max_entries must be >= 1");
        }
        if self.orchestrator.standard_batch_size == 0
            || self.orchestrator.comprehensive_batch_size == 0
        {
            anyhow::bail!("orchestrator batch sizes must be >= 1");
        }
        if self.orchestrator.analyzer_timeout_ms == 0 {
            anyhow::bail!("orchestrator.analyzer_timeout_ms must be > 0");
        }
        self.orchestrator.level()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache.ttl(), Duration::from_secs(300));
        assert_eq!(config.orchestrator.batch_size(AnalysisLevel::Comprehensive), 5);
        assert_eq!(config.orchestrator.batch_size(AnalysisLevel::Essential), 3);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config = Config::from_toml("[cache]\nmax_entries = 10\n").unwrap();
        assert_eq!(config.cache.max_entries, 10);
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.orchestrator.default_level, "standard");
    }

    #[test]
    fn env_overrides_win_and_bad_numbers_are_ignored() {
        let env: HashMap<&str, &str> = [
            ("HEXDIAG_LEVEL", "comprehensive"),
            ("HEXDIAG_CACHE_MAX", "not-a-number"),
            ("HEXDIAG_ANALYZER_TIMEOUT_MS", "250"),
        ]
        .into_iter()
        .collect();
        let mut config = Config::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.orchestrator.level().unwrap(), AnalysisLevel::Comprehensive);
        assert_eq!(config.cache.max_entries, 100);
        assert_eq!(config.orchestrator.analyzer_timeout_ms, 250);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = Config::default();
        config.orchestrator.default_level = "exhaustive".into();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.orchestrator.standard_batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.cache.ttl_secs = 0;
        assert!(config.validate().is_err());
    }
}
