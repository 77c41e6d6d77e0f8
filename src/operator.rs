//! Abstract interface the pool's caller consumes to fetch node lists and to
//! launch/scale/release services. Concrete operator backends (Mesos/K8s/devcloud)
//! are external collaborators and are not implemented here.

use async_trait::async_trait;

use crate::types::{LaunchParam, NodeSample, ServiceInfo};

/// Operations a container-scheduler backend must provide for the pool's caller
/// to drive admission and launch. The pool itself only consumes `NodeSample`s
/// produced by `get_resource`; it never calls the other methods directly — they
/// exist for the admission caller to confirm or cancel a reservation.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait OperatorPort: Send + Sync {
    /// Fetches one full snapshot of the cluster's nodes.
    async fn get_resource(&self, cluster_id: &str) -> anyhow::Result<Vec<NodeSample>>;

    async fn get_server_status(
        &self,
        cluster_id: &str,
        namespace: &str,
        name: &str,
    ) -> anyhow::Result<ServiceInfo>;

    async fn launch_server(&self, cluster_id: &str, param: LaunchParam) -> anyhow::Result<()>;

    async fn scale_server(
        &self,
        cluster_id: &str,
        namespace: &str,
        name: &str,
        instance: i64,
    ) -> anyhow::Result<()>;

    async fn release_server(
        &self,
        cluster_id: &str,
        namespace: &str,
        name: &str,
    ) -> anyhow::Result<()>;
}
