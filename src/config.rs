use crate::domains::view_planning::{CostTable, OptimizerConfig, PlannerSettings, SearchConfig, ViewConfig};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub costs: CostTable,
    pub views: ViewConfig,
    pub search: SearchConfig,
    pub optimizer: OptimizerConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding `arenas/`. Unset defers to the environment.
    pub base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub filter: String,
    /// Optional fast_log file for the service logger.
    pub file: Option<String>,
    pub file_level: String,
    /// Channel size of the buffered service logger; 0 disables buffering.
    pub buffer_capacity: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file: None,
            file_level: "info".to_string(),
            buffer_capacity: 256,
        }
    }
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn planner_settings(&self) -> PlannerSettings {
        PlannerSettings {
            costs: self.costs.clone(),
            views: self.views.clone(),
            search: self.search.clone(),
            optimizer: self.optimizer.clone(),
        }
    }
}
