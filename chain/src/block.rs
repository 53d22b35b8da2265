//! Block and blockchain related functionality.
pub mod history;

pub use gravwell_common::block::{Block, BlockTime, Height, PowCount, Target};
pub use history::BlockHistory;
