use thiserror::Error;

use crate::region::RegionKey;

/// Errors raised by `ResourcePool::get_free_instances`. All other failures
/// (metrics sink, invalid-sample logging, over-release) are logged and swallowed,
/// not surfaced as `ResourceError`.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The region is absent, or `requested + not_ready > available`.
    #[error("no enough resources for region {key}")]
    NoEnoughResources { key: RegionKey },

    /// The caller-supplied sizing function rejected or failed the grant; the
    /// inner error is propagated verbatim.
    #[error("sizing function rejected the grant: {0}")]
    Sizing(#[source] anyhow::Error),
}
