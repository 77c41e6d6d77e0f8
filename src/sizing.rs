/// Returns the number of whole instances that fit given free CPU/mem/disk and
/// their respective per-instance quotas. A zero quota (undefined instance size)
/// yields zero. The tightest of the three resources dominates; the result is
/// truncated toward zero and never negative.
pub fn free_instances(
    free_cpu: f64,
    free_mem: f64,
    free_disk: f64,
    cpu_per_instance: f64,
    mem_per_instance: f64,
    disk_per_instance: f64,
) -> i64 {
    if cpu_per_instance <= 0.0 || mem_per_instance <= 0.0 || disk_per_instance <= 0.0 {
        return 0;
    }

    let by_cpu = free_cpu / cpu_per_instance;
    let by_mem = free_mem / mem_per_instance;
    let by_disk = free_disk / disk_per_instance;

    by_cpu.min(by_mem).min(by_disk).max(0.0).trunc() as i64
}
