//! Boundary types: node snapshots and the operator-port request/response shapes.
//! `ServiceInfo`, `Endpoint`, `LaunchParam` are consumed from [`crate::operator::OperatorPort`]
//! and are not stored by the pool.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::InstanceType;
use crate::region::RegionKey;

/// One snapshot of one node's totals/used/attributes, as collected by an operator backend.
/// Immutable within one update cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodeSample {
    pub ip: String,
    pub hostname: String,

    pub cpu_total: f64,
    pub mem_total: f64,
    pub disk_total: f64,
    pub cpu_used: f64,
    pub mem_used: f64,
    pub disk_used: f64,

    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// If true, the node is excluded from capacity but still emitted as a zeroed
    /// metrics sample.
    #[serde(default)]
    pub disabled: bool,
}

impl NodeSample {
    /// A sample is valid iff all three totals are non-negative. Usage exceeding
    /// totals is tolerated (free may go negative; `InstanceSizer` clamps to zero).
    pub fn is_valid(&self) -> bool {
        self.cpu_total >= 0.0 && self.mem_total >= 0.0 && self.disk_total >= 0.0
    }

    pub fn region_key(&self) -> RegionKey {
        RegionKey::from_attributes(&self.attributes)
    }
}

/// Status of a service launched through the operator port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Container service launched and not ready.
    Staging,
    /// Container service running successfully.
    Running,
    /// Container service failed to be running.
    Failed,
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceStatus::Staging => "staging",
            ServiceStatus::Running => "running",
            ServiceStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Address information for one service instance's exposed endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Endpoint {
    pub ip: String,
    pub ports: HashMap<String, u16>,
}

/// Status of a service already consuming pool resources, as reported by the operator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceInfo {
    pub status: ServiceStatus,
    pub message: String,
    pub request_instances: i64,
    pub current_instances: i64,
    pub available_endpoints: Vec<Endpoint>,
}

/// hostPath volume mapping: `name -> {container_dir, host_dir}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Volume {
    pub container_dir: String,
    pub host_dir: String,
}

/// Request to launch a service through the operator port (Mesos/K8s/devcloud).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LaunchParam {
    pub name: String,
    pub namespace: String,
    pub attribute_condition: HashMap<String, String>,
    pub env: HashMap<String, String>,
    /// `port_name -> protocol`; port numbers are assigned by the substrate.
    pub ports: HashMap<String, String>,
    pub volumes: HashMap<String, Volume>,
    pub image: String,
    pub instance: i64,
}

impl LaunchParam {
    /// True iff `instance_type` matches this request's attribute condition after
    /// canonicalization (same platform, same city/group).
    pub fn check_queue_key(&self, instance_type: &InstanceType) -> bool {
        let (platform, city) = RegionKey::canonicalize(&self.attribute_condition);
        instance_type.group == city && instance_type.platform == platform
    }
}
