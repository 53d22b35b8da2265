//! Work-package retargeting.
//!
//! *Handles throughput estimation, streak detection and target adjustment.*
//!
//! The scheme is in the Kimoto Gravity Well family: after every block, each
//! work package's target is recomputed from a backward-looking window of
//! that package's own PoW history. The window widens one block at a time
//! until the derived adjustment hits a mass-dependent damping bound, so
//! noisy recent blocks are averaged out while sustained rate changes are
//! acted on quickly. Runs of saturated or empty blocks additionally move
//! the target exponentially, reacting much faster than the smooth estimator
//! alone.
#![warn(missing_docs)]


use thiserror::Error;

use gravwell_common::block::{Height, PowCount, Target};
use gravwell_common::params::Params;
use gravwell_common::work::{Work, WorkId, PRIMARY_WORK};

use crate::block::history::{self, BlockHistory};

/// Gain of the damping bound.
const KIMOTO_GAIN: f64 = 0.7084;

/// Exponent of the damping bound.
const KIMOTO_EXPONENT: f64 = -1.228;

/// Divisor applied to the damping-bound input before exponentiation.
const KIMOTO_SCALE: f64 = 144.0;

/// Multiplier turning accumulated PoW mass into the damping-bound input.
const MASS_SCALE: u64 = 30;

/// Floor for the seconds elapsed across a scan window.
const MIN_SECONDS_PASSED: u64 = 1;

/// An error related to retargeting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Retargeting was attempted on the genesis block, which has no history
    /// behind it.
    #[error("the genesis block cannot be retargeted")]
    GenesisRetarget,

    /// A scanned block carries no observation for the work package.
    #[error("block {height} has no observation for work package {work}")]
    MissingObservation {
        /// Height of the offending block.
        height: Height,
        /// The work package being retargeted.
        work: WorkId,
    },

    /// A block lookup failed.
    #[error(transparent)]
    History(#[from] history::Error),
}

/// The damping bound on a single smooth adjustment.
///
/// Grows without bound as the accumulated mass `x` approaches zero, and
/// tends to 1 as `x` grows: sparse windows may adjust aggressively, heavy
/// windows are pinned near no-change.
pub fn kimoto(x: f64) -> f64 {
    1.0 + KIMOTO_GAIN * (x / KIMOTO_SCALE).powf(KIMOTO_EXPONENT)
}

/// Lengths of the trailing full and empty block runs for a work package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Streaks {
    /// Consecutive trailing blocks at the saturation ceiling.
    pub full: u32,
    /// Consecutive trailing blocks with no work at all.
    pub empty: u32,
}

/// The outcome of a throughput scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// The smooth adjustment factor.
    pub factor: f64,
    /// Accumulated PoW mass over the scanned window.
    pub mass: u64,
    /// Number of blocks the scan read.
    pub scanned: usize,
}

/// Count the trailing full and empty block runs for `work`, scanning
/// backward from `height` and never below height 1.
///
/// A single scan tracks both runs with independent flags: a block that
/// breaks one run does not stop the other run from being counted further
/// down the chain.
pub fn streaks(
    history: &BlockHistory,
    height: Height,
    work: WorkId,
    ceiling: PowCount,
) -> Result<Streaks, Error> {
    if height == 0 {
        return Err(Error::GenesisRetarget);
    }

    let mut runs = Streaks::default();
    let mut full = true;
    let mut empty = true;
    let mut cursor = height;

    while full || empty {
        let pow = pow_at(history, cursor, work)?;

        if full && pow == ceiling {
            runs.full += 1;
        } else {
            full = false;
        }
        if empty && pow == 0 {
            runs.empty += 1;
        } else {
            empty = false;
        }

        if cursor == 1 {
            break;
        }
        cursor -= 1;
    }
    Ok(runs)
}

/// Estimate the throughput of `work` over a variable backward-looking
/// window and derive the smooth adjustment factor.
///
/// The window widens one block at a time, starting at `height`, until the
/// factor crosses the [`kimoto`] bound for the accumulated mass, the scan
/// reaches [`Params::retarget_window`] blocks, or it arrives at height 1.
/// A window with no mass at all yields a factor of 1.
///
/// The timestamp used for the elapsed-seconds computation is kept
/// monotonic: a block time earlier than one already scanned is clamped, so
/// an out-of-order feed can never produce a negative span. The span itself
/// is floored at one second.
pub fn estimate(
    history: &BlockHistory,
    height: Height,
    work: WorkId,
    params: &Params,
) -> Result<Estimate, Error> {
    if height == 0 {
        return Err(Error::GenesisRetarget);
    }

    let target_rate = params.target_rate();
    let mut latest = history.get(height)?.time();
    let mut cursor = height;
    let mut mass: u64 = 0;
    let mut scanned: usize = 0;
    let mut factor = 1.0;

    loop {
        scanned += 1;
        mass += u64::from(pow_at(history, cursor, work)?);

        let previous = history.get(cursor - 1)?.time();
        if latest < previous {
            latest = previous;
        }
        let seconds = (latest - previous).max(MIN_SECONDS_PASSED);
        cursor -= 1;

        let rate = mass as f64 / seconds as f64;
        if rate > 0.0 {
            factor = target_rate / rate;

            let bound = kimoto((mass * MASS_SCALE) as f64);
            if factor > bound || factor < bound.recip() {
                break;
            }
        } else {
            factor = 1.0;
        }
        if cursor < 1 || scanned as Height == params.retarget_window {
            break;
        }
    }

    Ok(Estimate {
        factor,
        mass,
        scanned,
    })
}

/// The retargeting engine.
///
/// Holds the consensus parameters and recomputes a work package's target
/// after every appended block. Retargets of distinct packages at the same
/// height are mutually independent; only the primary package's pass writes
/// the factor annotation on the shared block.
#[derive(Debug, Clone, Copy, Default)]
pub struct Retargeter {
    params: Params,
}

impl Retargeter {
    /// Create a retargeting engine from consensus parameters.
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    /// The engine's consensus parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Recompute the target of `work` after the block at `height`.
    ///
    /// `height` must not be the genesis block, and is expected to be the
    /// most recently appended block. The new target is returned, clamped to
    /// `1..=max_target`; the caller writes it back to the registry. A pure
    /// function of the history and the work package's current state:
    /// retargeting twice without appending yields the same target.
    pub fn retarget(
        &self,
        history: &mut BlockHistory,
        height: Height,
        work: &Work,
    ) -> Result<Target, Error> {
        let runs = streaks(history, height, work.id(), self.params.pow_ceiling)?;
        let estimate = estimate(history, height, work.id(), &self.params)?;

        let mut factor = estimate.factor;

        // A sustained run overrides the damped estimate: every saturated
        // block halves the target again, every empty block doubles it.
        if runs.full > 1 {
            factor /= 2f64.powi(runs.full as i32);
        }
        if runs.empty > 1 {
            factor *= 2f64.powi(runs.empty as i32);
        }

        log::trace!(
            "retarget: work={} height={} scanned={} mass={} full={} empty={} factor={:.4}",
            work.id(),
            height,
            estimate.scanned,
            estimate.mass,
            runs.full,
            runs.empty,
            factor,
        );

        if work.id() == PRIMARY_WORK {
            history.record_primary_factor(height, factor)?;
        }
        Ok(apply_factor(work.target(), factor, self.params.max_target))
    }
}

/// Scale a target by an adjustment factor, clamped to `1..=max_target`.
fn apply_factor(target: Target, factor: f64, max_target: Target) -> Target {
    let scaled = target as f64 * factor;

    if scaled >= max_target as f64 {
        max_target
    } else if scaled < 1.0 {
        1
    } else {
        scaled as Target
    }
}

fn pow_at(history: &BlockHistory, height: Height, work: WorkId) -> Result<PowCount, Error> {
    history
        .get(height)?
        .pow(work)
        .ok_or(Error::MissingObservation { height, work })
}
