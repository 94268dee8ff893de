//! Which shard performs global side effects.
//!
//! Command registration and removal touch state shared by every shard of the
//! application. In a managed deployment many shards run at once, so only shard 0
//! owns those mutations. Unmanaged deployments always own them.

/// Whether a shard with this index performs command registration and removal.
#[must_use]
pub const fn owns_global_commands(managed: bool, shard_index: u32) -> bool {
    !managed || shard_index == 0
}
