use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// A region-specific per-instance quota override, seeded into the pool at
/// construction time. `group` is the city/region name; it survives in the
/// pool's block map via inheritance even after this config list is no longer
/// consulted (see `ResourcePool::update_resources`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstanceType {
    pub group: String,
    pub platform: String,
    #[serde(default)]
    pub cpu_per_instance: f64,
    #[serde(default)]
    pub mem_per_instance: f64,
}

/// Pool-wide defaults plus the initial list of region overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PoolConfig {
    pub cpu_per_instance: f64,
    pub mem_per_instance: f64,
    pub disk_per_instance: f64,
    #[serde(default)]
    pub instance_types: Vec<InstanceType>,
}

impl PoolConfig {
    /// Loads a `PoolConfig` from a `.yaml`/`.yml` or `.json` file (by extension;
    /// anything else is parsed as JSON).
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading pool config from {}", path.display()))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("parsing YAML pool config {}", path.display())),
            _ => serde_json::from_str(&content)
                .with_context(|| format!("parsing JSON pool config {}", path.display())),
        }
    }
}
