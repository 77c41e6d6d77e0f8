//! Cluster resource pool: tracks compute nodes across a container-orchestration
//! substrate (Mesos/Kubernetes/mac-devcloud operators) and hands out instance
//! reservations to incoming build jobs, aggregated per geographic/platform region.
//!
//! The pool performs two-phase accounting — reported capacity (`available_instance`)
//! versus provisional reservations (`not_ready_instance`) — so many concurrent
//! admission callers can race to reserve without oversubscribing. See
//! [`pool::ResourcePool`] for the engine and [`block::CapacityBlock`] for the
//! per-region ledger it maintains.
//!
//! Placement of individual workers onto nodes, concrete operator backends, and
//! persistence are out of scope: this crate models them only at the
//! [`operator::OperatorPort`] and [`metrics::MetricsSink`] boundaries.

pub mod block;
pub mod config;
pub mod error;
pub mod metrics;
pub mod operator;
pub mod pool;
pub mod region;
pub mod sizing;
pub mod types;

pub use block::{CapacityBlock, RegionDetail};
pub use config::{InstanceType, PoolConfig};
pub use error::ResourceError;
pub use metrics::{LoggingMetricsSink, MetricsSink, NoopMetricsSink};
pub use operator::OperatorPort;
pub use pool::{PoolDefaults, ResourcePool};
pub use region::RegionKey;
pub use types::{Endpoint, LaunchParam, NodeSample, ServiceInfo, ServiceStatus, Volume};

#[cfg(any(test, feature = "test-util"))]
pub use operator::MockOperatorPort;
