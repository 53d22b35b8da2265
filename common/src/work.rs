//! Work packages and their registry.
//!
//! A *work package* is an independently-targeted proof-of-work lane within
//! one block. Each package carries its own mining target, retargeted after
//! every block from that package's own throughput history.
use thiserror::Error;

use crate::block::Target;

/// Identifier of a work package.
///
/// Ids are dense indices assigned at registration, so the per-block PoW
/// counts can be stored in a plain vector. The package count is fixed for
/// the lifetime of a run.
pub type WorkId = usize;

/// The work package whose retarget factor is annotated on each block.
pub const PRIMARY_WORK: WorkId = 0;

/// An error related to the work registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The work package was never registered.
    #[error("unknown work package {0}")]
    UnknownWork(WorkId),
}

/// A work package and its current mining target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Work {
    id: WorkId,
    target: Target,
}

impl Work {
    /// The work package identifier.
    pub fn id(&self) -> WorkId {
        self.id
    }

    /// The current mining target. Larger values are easier to mine.
    pub fn target(&self) -> Target {
        self.target
    }
}

/// Registry of all work packages of a run.
#[derive(Debug, Clone, Default)]
pub struct Works {
    works: Vec<Work>,
}

impl Works {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new work package with the given initial target.
    ///
    /// Ids are assigned densely from zero, in registration order; no two
    /// packages can share an id.
    pub fn register(&mut self, target: Target) -> WorkId {
        let id = self.works.len();
        self.works.push(Work { id, target });
        id
    }

    /// Get a work package by id.
    pub fn get(&self, id: WorkId) -> Result<&Work, Error> {
        self.works.get(id).ok_or(Error::UnknownWork(id))
    }

    /// Replace a work package's target.
    pub fn set_target(&mut self, id: WorkId, target: Target) -> Result<(), Error> {
        let work = self.works.get_mut(id).ok_or(Error::UnknownWork(id))?;
        work.target = target;
        Ok(())
    }

    /// Number of registered work packages.
    pub fn len(&self) -> usize {
        self.works.len()
    }

    /// Check whether no package was registered.
    pub fn is_empty(&self) -> bool {
        self.works.is_empty()
    }

    /// Iterate over all work packages, in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Work> {
        self.works.iter()
    }
}
