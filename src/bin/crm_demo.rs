// Not the CLI front-end for the hosting service (no flag parsing for
// get_config/get_stats/compile_test) — takes no arguments.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use colored::Colorize;
use rand::Rng;

use crm_pool::{
    InstanceType, LaunchParam, LoggingMetricsSink, NodeSample, OperatorPort, PoolDefaults,
    ResourcePool, ServiceInfo, ServiceStatus,
};

/// Synthetic operator standing in for a real Mesos/K8s/devcloud backend: returns
/// a handful of randomized nodes across two regions instead of querying a cluster.
struct InMemoryOperator;

#[async_trait]
impl OperatorPort for InMemoryOperator {
    async fn get_resource(&self, _cluster_id: &str) -> Result<Vec<NodeSample>> {
        let mut rng = rand::thread_rng();
        let regions = [("sz", "linux"), ("hk", "linux")];
        let mut samples = Vec::new();
        for (i, (city, platform)) in regions.iter().enumerate() {
            for n in 0..3 {
                let mut attributes = HashMap::new();
                attributes.insert("City".to_string(), city.to_string());
                attributes.insert("Platform".to_string(), platform.to_string());
                samples.push(NodeSample {
                    ip: format!("10.0.{i}.{n}"),
                    hostname: format!("{city}-node-{n}"),
                    cpu_total: 16.0,
                    mem_total: 32.0,
                    disk_total: 200.0,
                    cpu_used: rng.gen_range(0.0..8.0),
                    mem_used: rng.gen_range(0.0..16.0),
                    disk_used: rng.gen_range(0.0..50.0),
                    attributes,
                    disabled: false,
                });
            }
        }
        Ok(samples)
    }

    async fn get_server_status(
        &self,
        _cluster_id: &str,
        _namespace: &str,
        _name: &str,
    ) -> Result<ServiceInfo> {
        Ok(ServiceInfo {
            status: ServiceStatus::Running,
            message: "ok".to_string(),
            request_instances: 0,
            current_instances: 0,
            available_endpoints: vec![],
        })
    }

    async fn launch_server(&self, _cluster_id: &str, _param: LaunchParam) -> Result<()> {
        Ok(())
    }

    async fn scale_server(
        &self,
        _cluster_id: &str,
        _namespace: &str,
        _name: &str,
        _instance: i64,
    ) -> Result<()> {
        Ok(())
    }

    async fn release_server(&self, _cluster_id: &str, _namespace: &str, _name: &str) -> Result<()> {
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    println!("{}", "🧮 crm-pool demo".bright_cyan().bold());
    println!("{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_cyan());

    let operator = InMemoryOperator;
    let instance_types = vec![InstanceType {
        group: "sz".to_string(),
        platform: "linux".to_string(),
        cpu_per_instance: 2.0,
        mem_per_instance: 4.0,
    }];
    let pool = ResourcePool::new(
        PoolDefaults {
            cpu_per_instance: 4.0,
            mem_per_instance: 8.0,
            disk_per_instance: 10.0,
        },
        &instance_types,
        Arc::new(LoggingMetricsSink),
    );

    print!("🔗 Fetching node snapshot... ");
    let samples = operator.get_resource("demo-cluster").await?;
    println!("{}", format!("✅ {} node(s)", samples.len()).bright_green());

    pool.update_resources(samples);

    let mut sz = HashMap::new();
    sz.insert("City".to_string(), "sz".to_string());
    sz.insert("Platform".to_string(), "linux".to_string());

    let (granted, key) = pool.get_free_instances(&sz, |available| Ok(available.min(2)))?;
    println!(
        "📦 Granted {} instance(s) in region {}",
        granted.to_string().bright_yellow(),
        key.to_string().bright_green()
    );

    pool.release_no_ready_instance(&key, 1);
    println!("↩️  Released 1 instance back to region {}", key);

    println!();
    println!("{}", "📊 Stats:".bright_yellow().bold());
    println!("{}", pool.get_stats());

    println!();
    println!("{}", "📋 Detail:".bright_yellow().bold());
    for detail in pool.get_detail() {
        println!(
            "   {} — available={} reported={} not_ready={}",
            detail.key.to_string().bright_green(),
            detail.available,
            detail.reported,
            detail.not_ready,
        );
    }

    Ok(())
}
