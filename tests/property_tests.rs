use std::collections::HashMap;
use std::sync::{Arc, Barrier};
use std::thread;

use proptest::prelude::*;

use crm_pool::{InstanceType, NodeSample, NoopMetricsSink, PoolDefaults, ResourcePool};

fn defaults() -> PoolDefaults {
    PoolDefaults {
        cpu_per_instance: 4.0,
        mem_per_instance: 8.0,
        disk_per_instance: 10.0,
    }
}

fn attrs(city: &str, platform: &str) -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert("City".to_string(), city.to_string());
    m.insert("Platform".to_string(), platform.to_string());
    m
}

fn sample(cpu: f64, mem: f64, disk: f64) -> NodeSample {
    NodeSample {
        ip: "10.9.9.9".to_string(),
        hostname: "prop-node".to_string(),
        cpu_total: cpu,
        mem_total: mem,
        disk_total: disk,
        attributes: attrs("sz", "linux"),
        ..Default::default()
    }
}

proptest! {
    /// Conservation: every instance ever granted is accounted for by
    /// `not_ready_instance` until released, and `effective_available` never
    /// exceeds the reported `available_instance`.
    #[test]
    fn conservation_of_the_ledger(cpu in 1.0f64..500.0, mem in 1.0f64..500.0, disk in 1.0f64..500.0) {
        let pool = ResourcePool::new(defaults(), &[], Arc::new(NoopMetricsSink));
        pool.update_resources(vec![sample(cpu, mem, disk)]);

        let mut granted_total = 0i64;
        while let Ok((granted, key)) = pool.get_free_instances(&attrs("sz", "linux"), |available| Ok(available.min(1))) {
            if granted == 0 {
                pool.release_no_ready_instance(&key, 0);
                break;
            }
            granted_total += granted;
            let detail = pool.get_detail();
            let region = detail.iter().find(|d| d.key == key).unwrap();
            prop_assert!(region.available >= 0);
            prop_assert!(region.not_ready <= region.reported);
        }

        let detail = pool.get_detail();
        prop_assert_eq!(detail[0].not_ready, granted_total);
    }

    /// Merge idempotence: feeding the same snapshot twice in a row leaves every
    /// region's detail unchanged.
    #[test]
    fn merge_idempotence(cpu in 0.0f64..200.0, mem in 0.0f64..200.0, disk in 0.0f64..200.0) {
        let pool = ResourcePool::new(defaults(), &[], Arc::new(NoopMetricsSink));
        let samples = vec![sample(cpu, mem, disk)];
        pool.update_resources(samples.clone());
        let first = pool.get_detail();
        pool.update_resources(samples);
        let second = pool.get_detail();
        prop_assert_eq!(first, second);
    }

    /// Quota inheritance: a per-region override set at construction survives any
    /// number of subsequent snapshot merges unchanged.
    #[test]
    fn quota_inheritance_across_churn(rounds in 1usize..6, cpu in 1.0f64..200.0, mem in 1.0f64..200.0) {
        let instance_types = vec![InstanceType {
            group: "sz".to_string(),
            platform: "linux".to_string(),
            cpu_per_instance: 3.0,
            mem_per_instance: 5.0,
        }];
        let pool = ResourcePool::new(defaults(), &instance_types, Arc::new(NoopMetricsSink));
        for _ in 0..rounds {
            pool.update_resources(vec![sample(cpu, mem, 1000.0)]);
        }
        let detail = pool.get_detail();
        prop_assert_eq!(detail[0].cpu_per_instance, 3.0);
        prop_assert_eq!(detail[0].mem_per_instance, 5.0);
    }

    /// Not-ready inheritance: an outstanding reservation survives a snapshot
    /// merge for the same region, untouched by the new totals.
    #[test]
    fn not_ready_inheritance_across_merge(first_cpu in 1.0f64..200.0, second_cpu in 1.0f64..200.0) {
        let pool = ResourcePool::new(defaults(), &[], Arc::new(NoopMetricsSink));
        pool.update_resources(vec![sample(first_cpu, 200.0, 1000.0)]);
        let (granted, key) = pool.get_free_instances(&attrs("sz", "linux"), |available| Ok(available.min(1))).unwrap();
        prop_assume!(granted == 1);

        pool.update_resources(vec![sample(second_cpu, 200.0, 1000.0)]);
        let detail = pool.get_detail();
        let region = detail.iter().find(|d| d.key == key).unwrap();
        prop_assert_eq!(region.not_ready, 1);
    }

    /// Sizer monotonicity: increasing any one free-resource input never
    /// decreases the number of instances the sizer reports fitting.
    #[test]
    fn sizer_is_monotonic_in_free_cpu(
        free_cpu in 0.0f64..1000.0,
        delta in 0.0f64..1000.0,
        free_mem in 0.0f64..1000.0,
        free_disk in 0.0f64..1000.0,
    ) {
        let before = crm_pool::sizing::free_instances(free_cpu, free_mem, free_disk, 4.0, 8.0, 10.0);
        let after = crm_pool::sizing::free_instances(free_cpu + delta, free_mem, free_disk, 4.0, 8.0, 10.0);
        prop_assert!(after >= before);
    }
}

/// Non-oversubscription under concurrency: many threads race to reserve from a
/// fixed-capacity region; the sum of grants never exceeds the reported supply,
/// regardless of interleaving.
#[test]
fn non_oversubscription_under_concurrent_callers() {
    let pool = Arc::new(ResourcePool::new(defaults(), &[], Arc::new(NoopMetricsSink)));
    pool.update_resources(vec![sample(40.0, 80.0, 1000.0)]);
    let supply = pool.get_detail()[0].reported;

    let threads = 16;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let pool = Arc::clone(&pool);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                pool.get_free_instances(&attrs("sz", "linux"), |available| Ok(available.min(1)))
                    .map(|(granted, _)| granted)
                    .unwrap_or(0)
            })
        })
        .collect();

    let total_granted: i64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert!(total_granted <= supply);
    assert_eq!(pool.get_detail()[0].not_ready, total_granted);
}
