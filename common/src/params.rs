//! Consensus parameters of the retargeting engine.
//!
//! These values are part of the observable retargeting behavior, not
//! tunables: a conforming chain must reproduce them exactly.
use crate::block::{BlockTime, Height, PowCount, Target};

/// The easiest possible mining target. Targets are clamped to it from above.
pub const MAX_TARGET: Target = 0x000000ffffffffffffffffffffffffff;

/// Maximum PoW units creditable to a single block, per work package. Blocks
/// at this ceiling count toward a work package's "full" streak.
pub const POW_CEILING: PowCount = 20;

/// Desired PoW units per work package per spacing interval.
pub const TARGET_POW: PowCount = 10;

/// Target block spacing, in seconds.
pub const TARGET_SPACING: BlockTime = 60;

/// Maximum number of blocks a retarget scan may read backward.
pub const RETARGET_WINDOW: Height = 144;

/// Consensus parameters shared by every retarget computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    /// The easiest possible target.
    pub max_target: Target,
    /// Per-block PoW saturation ceiling, per work package.
    pub pow_ceiling: PowCount,
    /// Desired PoW units per spacing interval, per work package.
    pub target_pow: PowCount,
    /// Target block spacing, in seconds.
    pub target_spacing: BlockTime,
    /// Backward-scan window cap, in blocks.
    pub retarget_window: Height,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_target: MAX_TARGET,
            pow_ceiling: POW_CEILING,
            target_pow: TARGET_POW,
            target_spacing: TARGET_SPACING,
            retarget_window: RETARGET_WINDOW,
        }
    }
}

impl Params {
    /// Desired steady-state throughput, in PoW units per second.
    pub fn target_rate(&self) -> f64 {
        f64::from(self.target_pow) / self.target_spacing as f64
    }
}
