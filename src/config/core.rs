use anyhow::{Context, Result, bail};
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::parallel::{ExecutionStrategy, StrategyKind};

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

const ENV_PREFIX: &str = "FORKBENCH_";
const REPO_CONFIG: &str = "forkbench.toml";

/// Fully merged configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchConfig {
    pub runtime: RuntimeConfig,
    pub fib: ProblemConfig,
    pub nqueens: ProblemConfig,
    pub qsort: SortConfig,
}

/// Executor selection and sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub strategy: StrategyKind,
    /// Maximum worker threads (0 = derive from cores)
    pub max_threads: usize,
    /// Percentage of CPU cores to use (1-100)
    pub thread_percentage: u8,
    pub stack_size_mb: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemConfig {
    pub default_n: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortConfig {
    pub default_n: i64,
    pub timed_default_n: i64,
    pub seed: u32,
    pub trials: u32,
}

impl BenchConfig {
    pub fn load_with_custom_config(custom_config: Option<&str>) -> Result<Self> {
        let config: BenchConfig = Self::figment(custom_config)
            .extract()
            .context("Failed to load configuration")?;
        config.validate()?;

        tracing::trace!("Configuration loaded: {:?}", config);
        Ok(config)
    }

    fn figment(custom_config: Option<&str>) -> Figment {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        // If custom config is specified, use only that + defaults + env vars
        if let Some(custom_path) = custom_config {
            if !Path::new(custom_path).exists() {
                tracing::warn!("Config file {} not found, using defaults", custom_path);
            }
            figment = figment.merge(Toml::file(custom_path));
        } else {
            figment = figment
                .merge(Toml::file(Self::user_config_path()))
                .merge(Toml::file(REPO_CONFIG));
        }

        // Environment variables always have highest priority
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.runtime.thread_percentage) {
            bail!(
                "runtime.thread_percentage must be between 1 and 100, got {}",
                self.runtime.thread_percentage
            );
        }
        if self.runtime.stack_size_mb == 0 {
            bail!("runtime.stack_size_mb must be at least 1");
        }
        if self.qsort.trials == 0 {
            bail!("qsort.trials must be at least 1");
        }
        Ok(())
    }

    /// Merged configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration as TOML")
    }

    /// Merged configuration as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize configuration as JSON")
    }

    fn user_config_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{}/.config/forkbench/config.toml", home),
            Err(_) => "~/.config/forkbench/config.toml".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Strategy with the worker count derived from cores and limits
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        let workers =
            ExecutionStrategy::calculate_optimal_workers(self.max_threads, self.thread_percentage);
        ExecutionStrategy::from_kind(self.strategy, workers)
    }

    /// Stack size in bytes for every thread that runs frames
    pub fn stack_size(&self) -> usize {
        self.stack_size_mb.saturating_mul(1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> String {
        let path = dir.path().join("custom.toml");
        fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_embedded_defaults() {
        let config: BenchConfig = Figment::new()
            .merge(Toml::string(DEFAULT_CONFIG))
            .extract()
            .unwrap();

        assert_eq!(config.runtime.strategy, StrategyKind::WorkStealing);
        assert_eq!(config.runtime.max_threads, 0);
        assert_eq!(config.runtime.thread_percentage, 100);
        assert_eq!(config.fib.default_n, 10);
        assert_eq!(config.nqueens.default_n, 13);
        assert_eq!(config.qsort.default_n, 10_000);
        assert_eq!(config.qsort.timed_default_n, 1_000_000);
        assert_eq!(config.qsort.seed, 13);
        assert_eq!(config.qsort.trials, 1);
    }

    #[test]
    fn test_custom_config_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[runtime]
strategy = "threads"
max_threads = 2

[fib]
default_n = 20
"#,
        );

        let config = BenchConfig::load_with_custom_config(Some(&path)).unwrap();
        assert_eq!(config.runtime.strategy, StrategyKind::Threads);
        assert_eq!(config.runtime.max_threads, 2);
        assert_eq!(config.fib.default_n, 20);
        // Untouched sections keep their defaults
        assert_eq!(config.qsort.seed, 13);
        assert!(config.runtime.execution_strategy().workers() <= 2);
    }

    #[test]
    fn test_missing_custom_config_falls_back() {
        let config = BenchConfig::load_with_custom_config(Some("non_existent.toml"));
        assert!(config.is_ok(), "Should handle missing custom config gracefully");
    }

    #[test]
    fn test_invalid_percentage_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[runtime]\nthread_percentage = 0\n");
        assert!(BenchConfig::load_with_custom_config(Some(&path)).is_err());
    }

    #[test]
    fn test_zero_stack_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[runtime]\nstack_size_mb = 0\n");
        let err = BenchConfig::load_with_custom_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("stack_size_mb"));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[runtime]\nstrategy = \"fibers\"\n");
        assert!(BenchConfig::load_with_custom_config(Some(&path)).is_err());
    }

    #[test]
    fn test_serialization() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "");
        let config = BenchConfig::load_with_custom_config(Some(&path)).unwrap();

        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[runtime]"));
        assert!(toml.contains("timed_default_n"));

        let json: serde_json::Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(json["nqueens"]["default_n"], 13);
    }

    #[test]
    fn test_sequential_strategy_from_config() {
        let runtime = RuntimeConfig {
            strategy: StrategyKind::Sequential,
            max_threads: 8,
            thread_percentage: 50,
            stack_size_mb: 32,
        };
        assert_eq!(runtime.execution_strategy(), ExecutionStrategy::Sequential);
        assert_eq!(runtime.stack_size(), 32 * 1024 * 1024);
    }
}
