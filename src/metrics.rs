//! Fire-and-forget observer of per-node resource samples.

use log::debug;

use crate::region::RegionKey;
use crate::types::NodeSample;

/// Six gauges per node per update (CPU/mem/disk total+used), labeled by `ip` and
/// zone `crm_<platform>/<city>`. Implementations must not block or fail the
/// resource update that triggered them; `ResourcePool::update_resources` already
/// dispatches each call onto its own task, so implementations may do blocking
/// I/O internally if they choose a runtime that tolerates it.
pub trait MetricsSink: Send + Sync {
    fn record(&self, sample: &NodeSample);
}

/// Default sink: writes the six gauges as a single `debug` log line. Useful for
/// standalone use where no metrics backend is wired in.
#[derive(Debug, Default)]
pub struct LoggingMetricsSink;

impl MetricsSink for LoggingMetricsSink {
    fn record(&self, sample: &NodeSample) {
        let zone = format!("crm_{}", RegionKey::from_attributes(&sample.attributes));
        if sample.disabled {
            debug!(
                "metrics ip={} zone={} cpu_total=0 cpu_used=0 mem_total=0 mem_used=0 disk_total=0 disk_used=0 (disabled)",
                sample.ip, zone
            );
            return;
        }
        debug!(
            "metrics ip={} zone={} cpu_total={} cpu_used={} mem_total={} mem_used={} disk_total={} disk_used={}",
            sample.ip,
            zone,
            sample.cpu_total,
            sample.cpu_used,
            sample.mem_total,
            sample.mem_used,
            sample.disk_total,
            sample.disk_used,
        );
    }
}

/// Sink that discards every sample; for tests that don't care about metrics.
#[derive(Debug, Default)]
pub struct NoopMetricsSink;

impl MetricsSink for NoopMetricsSink {
    fn record(&self, _sample: &NodeSample) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingSink(AtomicUsize);

    impl MetricsSink for CountingSink {
        fn record(&self, _sample: &NodeSample) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_sink_does_nothing_observable() {
        let sink = NoopMetricsSink;
        sink.record(&NodeSample::default());
    }

    #[test]
    fn sinks_are_object_safe_and_shareable() {
        let sink: Arc<dyn MetricsSink> = Arc::new(CountingSink::default());
        sink.record(&NodeSample {
            attributes: HashMap::new(),
            ..Default::default()
        });
    }
}
