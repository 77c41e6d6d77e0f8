use crate::region::RegionKey;

/// Summed capacity/usage for one region, plus the two-phase admission ledger
/// (`available_instance` reported supply, `not_ready_instance` reserved-but-unconfirmed).
///
/// Pure data: the zero value is the additive identity for the merge performed by
/// `ResourcePool::update_resources`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapacityBlock {
    pub cpu_total: f64,
    pub mem_total: f64,
    pub disk_total: f64,
    pub cpu_used: f64,
    pub mem_used: f64,
    pub disk_used: f64,

    pub cpu_per_instance: f64,
    pub mem_per_instance: f64,

    pub available_instance: i64,
    pub not_ready_instance: i64,
}

impl CapacityBlock {
    /// Headroom a new grant may still consume: `available_instance - not_ready_instance`.
    pub fn effective_available(&self) -> i64 {
        self.available_instance - self.not_ready_instance
    }
}

/// Read-only projection of a region's block, returned by `ResourcePool::get_detail`.
/// Never exposes the block itself — only an owned copy of the fields callers need.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionDetail {
    pub key: RegionKey,
    pub cpu_total: f64,
    pub cpu_used: f64,
    pub mem_total: f64,
    pub mem_used: f64,
    pub disk_total: f64,
    pub disk_used: f64,
    pub cpu_per_instance: f64,
    pub mem_per_instance: f64,
    /// `available_instance - not_ready_instance`.
    pub available: i64,
    /// `available_instance`, the reported supply.
    pub reported: i64,
    pub not_ready: i64,
}

impl RegionDetail {
    pub(crate) fn from_block(key: RegionKey, block: &CapacityBlock) -> Self {
        RegionDetail {
            key,
            cpu_total: block.cpu_total,
            cpu_used: block.cpu_used,
            mem_total: block.mem_total,
            mem_used: block.mem_used,
            disk_total: block.disk_total,
            disk_used: block.disk_used,
            cpu_per_instance: block.cpu_per_instance,
            mem_per_instance: block.mem_per_instance,
            available: block.effective_available(),
            reported: block.available_instance,
            not_ready: block.not_ready_instance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_value_is_additive_identity() {
        let zero = CapacityBlock::default();
        assert_eq!(zero.effective_available(), 0);
    }

    #[test]
    fn effective_available_subtracts_not_ready() {
        let block = CapacityBlock {
            available_instance: 5,
            not_ready_instance: 2,
            ..Default::default()
        };
        assert_eq!(block.effective_available(), 3);
    }
}
