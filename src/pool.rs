//! The admission and snapshot-merge engine: a thread-safe owner of the
//! `RegionKey -> CapacityBlock` mapping.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use parking_lot::Mutex;

use crate::block::{CapacityBlock, RegionDetail};
use crate::config::{InstanceType, PoolConfig};
use crate::error::ResourceError;
use crate::metrics::MetricsSink;
use crate::region::RegionKey;
use crate::sizing;
use crate::types::NodeSample;

/// Pool-wide default per-instance quotas, set at construction, immutable for
/// the life of the pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolDefaults {
    pub cpu_per_instance: f64,
    pub mem_per_instance: f64,
    pub disk_per_instance: f64,
}

struct PoolState {
    node_block_map: HashMap<RegionKey, CapacityBlock>,
    last_update_time: DateTime<Utc>,
}

/// Thread-safe owner of the cluster's per-region capacity blocks. Process-wide
/// singleton per service; lifecycle is the process, there is no explicit teardown.
///
/// A single exclusive lock guards every read and write of the block map and its
/// fields (see module docs on concurrency in the crate root). The lock is a
/// synchronous `parking_lot::Mutex`: critical sections here never hold it across
/// an `.await` point, so an async-aware lock would only add overhead.
pub struct ResourcePool {
    defaults: PoolDefaults,
    metrics: Arc<dyn MetricsSink>,
    inner: Mutex<PoolState>,
}

impl ResourcePool {
    /// Constructs a pool with pool-wide default quotas and an initial list of
    /// region overrides. The overridden blocks start with zero capacity; their
    /// totals/used/available_instance are populated by the first `update_resources`.
    pub fn new(
        defaults: PoolDefaults,
        instance_types: &[InstanceType],
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        let mut node_block_map = HashMap::with_capacity(instance_types.len());
        for instance_type in instance_types {
            let key = RegionKey::new(instance_type.platform.clone(), instance_type.group.clone());
            node_block_map.insert(
                key,
                CapacityBlock {
                    cpu_per_instance: instance_type.cpu_per_instance,
                    mem_per_instance: instance_type.mem_per_instance,
                    ..Default::default()
                },
            );
        }
        Self {
            defaults,
            metrics,
            inner: Mutex::new(PoolState {
                node_block_map,
                last_update_time: Utc::now(),
            }),
        }
    }

    pub fn from_config(config: &PoolConfig, metrics: Arc<dyn MetricsSink>) -> Self {
        Self::new(
            PoolDefaults {
                cpu_per_instance: config.cpu_per_instance,
                mem_per_instance: config.mem_per_instance,
                disk_per_instance: config.disk_per_instance,
            },
            &config.instance_types,
            metrics,
        )
    }

    /// Atomically replaces the block map with a fresh aggregation of `samples`,
    /// the complete current snapshot for this pool. Emits a fire-and-forget
    /// metrics record per sample (including disabled ones, zeroed) before taking
    /// the lock, so a slow/blocked sink never holds up the merge.
    ///
    /// A region absent from `samples` disappears from the map along with its
    /// not-ready count. A region present in both generations carries its
    /// `not_ready_instance` and any per-region quota override forward unchanged.
    pub fn update_resources(&self, samples: Vec<NodeSample>) {
        for sample in &samples {
            let metrics = Arc::clone(&self.metrics);
            let sample = sample.clone();
            tokio::spawn(async move {
                metrics.record(&sample);
            });
        }

        let mut scratch: HashMap<RegionKey, CapacityBlock> = HashMap::new();
        let mut state = self.inner.lock();

        for sample in &samples {
            if sample.disabled {
                continue;
            }
            if !sample.is_valid() {
                warn!(
                    "crm: dropping invalid sample for node {} ({}): cpu_total={} mem_total={} disk_total={}",
                    sample.hostname, sample.ip, sample.cpu_total, sample.mem_total, sample.disk_total
                );
                continue;
            }

            let key = sample.region_key();

            let (cpu_per_instance, mem_per_instance, not_ready) = match state.node_block_map.get(&key) {
                Some(prev) => (
                    if prev.cpu_per_instance > 0.0 {
                        prev.cpu_per_instance
                    } else {
                        self.defaults.cpu_per_instance
                    },
                    if prev.mem_per_instance > 0.0 {
                        prev.mem_per_instance
                    } else {
                        self.defaults.mem_per_instance
                    },
                    prev.not_ready_instance,
                ),
                None => (
                    self.defaults.cpu_per_instance,
                    self.defaults.mem_per_instance,
                    0,
                ),
            };

            let entry = scratch.entry(key).or_insert_with(|| CapacityBlock {
                cpu_per_instance,
                mem_per_instance,
                not_ready_instance: not_ready,
                ..Default::default()
            });

            entry.cpu_total += sample.cpu_total;
            entry.mem_total += sample.mem_total;
            entry.disk_total += sample.disk_total;
            entry.cpu_used += sample.cpu_used;
            entry.mem_used += sample.mem_used;
            entry.disk_used += sample.disk_used;

            let free_cpu = sample.cpu_total - sample.cpu_used;
            let free_mem = sample.mem_total - sample.mem_used;
            let free_disk = sample.disk_total - sample.disk_used;
            entry.available_instance += sizing::free_instances(
                free_cpu,
                free_mem,
                free_disk,
                cpu_per_instance,
                mem_per_instance,
                self.defaults.disk_per_instance,
            );
        }

        debug!("crm: merged {} region(s) from {} sample(s)", scratch.len(), samples.len());

        state.node_block_map = scratch;
        state.last_update_time = Utc::now();
    }

    /// Locates the region for `condition`, asks `sizing_fn` how many instances to
    /// reserve given the current headroom, and — if it fits — increments
    /// `not_ready_instance` and returns the grant. The entire check-and-increment
    /// runs under one lock acquisition, so concurrent callers are serialized.
    pub fn get_free_instances<F>(
        &self,
        condition: &HashMap<String, String>,
        sizing_fn: F,
    ) -> Result<(i64, RegionKey), ResourceError>
    where
        F: FnOnce(i64) -> anyhow::Result<i64>,
    {
        let key = RegionKey::from_attributes(condition);
        let mut state = self.inner.lock();

        let (available, not_ready) = match state.node_block_map.get(&key) {
            Some(block) => (block.available_instance, block.not_ready_instance),
            None => return Err(ResourceError::NoEnoughResources { key }),
        };

        let effective = available - not_ready;
        let requested = sizing_fn(effective).map_err(ResourceError::Sizing)?;

        if requested + not_ready > available {
            return Err(ResourceError::NoEnoughResources { key });
        }

        let block = state
            .node_block_map
            .get_mut(&key)
            .expect("block present from the lookup above, taken under the same lock");
        block.not_ready_instance += requested;

        debug!(
            "crm: granted {} instance(s) from {}, available={} not_ready={}",
            requested, key, block.available_instance, block.not_ready_instance
        );

        Ok((requested, key))
    }

    /// Decrements `not_ready_instance` by `n`. No-op if the region is absent.
    /// Over-release (driving the counter negative) is clamped to zero and logged,
    /// never panics.
    pub fn release_no_ready_instance(&self, key: &RegionKey, n: i64) {
        let mut state = self.inner.lock();
        if let Some(block) = state.node_block_map.get_mut(key) {
            let new_value = block.not_ready_instance - n;
            if new_value < 0 {
                warn!(
                    "crm: over-release on region {}: releasing {} would drive not_ready to {}, clamping to 0",
                    key, n, new_value
                );
                block.not_ready_instance = 0;
            } else {
                block.not_ready_instance = new_value;
            }
        }
    }

    /// Seeds `not_ready_instance` for `key` from a persisted unconfirmed
    /// reservation, creating a zeroed block if none exists yet. Called once per
    /// record at process start, before any snapshot arrives; the next
    /// `update_resources` will populate `available_instance`.
    pub fn recover_no_ready_block(&self, key: RegionKey, n: i64) {
        let mut state = self.inner.lock();
        let block = state.node_block_map.entry(key).or_default();
        block.not_ready_instance += n;
    }

    /// Human-readable per-region diagnostic dump.
    pub fn get_stats(&self) -> String {
        let state = self.inner.lock();
        let mut message = String::new();
        for (key, block) in state.node_block_map.iter() {
            message.push_str(&format!(
                "\nregion: {} [cpu_per_instance: {:.2}, mem_per_instance: {:.2}], available-instance: {}, reported-instance: {}, not-ready-instance: {}, CPU-left: {:.2}/{:.2}, MEM-left: {:.2}/{:.2}",
                key,
                block.cpu_per_instance,
                block.mem_per_instance,
                block.effective_available(),
                block.available_instance,
                block.not_ready_instance,
                block.cpu_total - block.cpu_used,
                block.cpu_total,
                block.mem_total - block.mem_used,
                block.mem_total,
            ));
        }
        message
    }

    /// Per-region records exposing totals, used, effective quota, and the three
    /// instance counters (available, reported, not-ready).
    pub fn get_detail(&self) -> Vec<RegionDetail> {
        let state = self.inner.lock();
        state
            .node_block_map
            .iter()
            .map(|(key, block)| RegionDetail::from_block(key.clone(), block))
            .collect()
    }

    pub fn get_last_update_time(&self) -> DateTime<Utc> {
        self.inner.lock().last_update_time
    }
}
