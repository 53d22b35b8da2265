//! Ingestion of per-block feed observations.
//!
//! The engine consumes an external feed which produces, for every new
//! height, a block timestamp and one PoW count per registered work package.
//! This module validates a single observation, appends the resulting block
//! to the history and retargets every work package, in id order.
//!
//! Validation rejects malformed observations instead of coercing them: a
//! count above the saturation ceiling or an observation that does not cover
//! every package is an error and nothing is appended. Timestamps are taken
//! as-is; the estimator clamps out-of-order values during its scan.
use thiserror::Error;

use gravwell_common::block::{Block, BlockTime, Height, PowCount};
use gravwell_common::work::{self, WorkId, Works};

use crate::block::history::BlockHistory;
use crate::retarget::{self, Retargeter};

/// An error related to feed ingestion.
#[derive(Debug, Error)]
pub enum Error {
    /// The observation does not cover every registered work package.
    #[error("observation carries {actual} work entries, expected {expected}")]
    WorkCountMismatch {
        /// Number of registered work packages.
        expected: usize,
        /// Number of entries in the observation.
        actual: usize,
    },

    /// A PoW count exceeds the per-block saturation ceiling.
    #[error("work package {work}: pow count {count} exceeds ceiling {ceiling}")]
    AboveCeiling {
        /// The offending work package.
        work: WorkId,
        /// The rejected count.
        count: PowCount,
        /// The ceiling it violates.
        ceiling: PowCount,
    },

    /// Retargeting failed.
    #[error(transparent)]
    Retarget(#[from] retarget::Error),

    /// A work registry lookup failed.
    #[error(transparent)]
    Work(#[from] work::Error),
}

/// A single feed item: one block's timestamp and per-work PoW counts.
#[derive(Debug, Clone)]
pub struct Observation {
    /// Block timestamp, seconds since Epoch.
    pub time: BlockTime,
    /// PoW units observed per work package, indexed by [`WorkId`].
    pub pow: Vec<PowCount>,
}

/// Validate an observation, append it as a block and retarget every
/// registered work package. Returns the height of the appended block.
pub fn extend(
    history: &mut BlockHistory,
    works: &mut Works,
    retargeter: &Retargeter,
    observation: Observation,
) -> Result<Height, Error> {
    if observation.pow.len() != works.len() {
        return Err(Error::WorkCountMismatch {
            expected: works.len(),
            actual: observation.pow.len(),
        });
    }
    let ceiling = retargeter.params().pow_ceiling;
    for (work, &count) in observation.pow.iter().enumerate() {
        if count > ceiling {
            return Err(Error::AboveCeiling {
                work,
                count,
                ceiling,
            });
        }
    }

    let height = history.append(Block::new(observation.time, observation.pow));
    log::debug!(
        "block {} appended, retargeting {} work package(s)",
        height,
        works.len()
    );

    for id in 0..works.len() {
        let work = *works.get(id)?;
        let target = retargeter.retarget(history, height, &work)?;
        works.set_target(id, target)?;
    }
    Ok(height)
}
