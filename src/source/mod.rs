//! Pillar sources.
//!
//! This module provides the capability interface the validator reads pillar
//! through, with two implementations:
//! - Directory of rendered per-host pillar files
//! - Whole-environment snapshots

mod directory;
mod pillar;
mod snapshot;

pub use directory::DirectorySource;
pub use pillar::PillarSource;
pub use snapshot::SnapshotSource;

#[cfg(test)]
pub use pillar::MockPillarSource;
