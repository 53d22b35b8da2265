//! Append-only block history.
use nonempty::NonEmpty;
use thiserror::Error;

use gravwell_common::block::iter::Iter;
use gravwell_common::block::{Block, Height};

/// An error related to the block history.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum Error {
    /// The height is not covered by the history.
    #[error("height {height} is out of range for a history of {len} block(s)")]
    OutOfRange {
        /// The height that was looked up.
        height: Height,
        /// Length of the history at lookup time.
        len: usize,
    },
}

/// Append-only ordered sequence of blocks, genesis first.
///
/// Index order equals production order: height `h` refers to the `h`-th
/// appended block, with the genesis block at height 0. Blocks are never
/// deleted, and never mutated beyond the single primary-factor write
/// performed during the block's retarget pass.
///
/// The history is safe for concurrent readers once a block is fully
/// appended; appends take `&mut self` and are therefore serialized with
/// respect to reads by the borrow checker.
#[derive(Debug, Clone)]
pub struct BlockHistory {
    chain: NonEmpty<Block>,
}

impl BlockHistory {
    /// Create a history from its genesis block.
    pub fn new(genesis: Block) -> Self {
        Self {
            chain: NonEmpty::new(genesis),
        }
    }

    /// Append a block to the end of the history. Returns its height.
    pub fn append(&mut self, block: Block) -> Height {
        self.chain.push(block);
        self.height()
    }

    /// Get the block at the given height.
    pub fn get(&self, height: Height) -> Result<&Block, Error> {
        self.chain.get(height as usize).ok_or(Error::OutOfRange {
            height,
            len: self.len(),
        })
    }

    /// Get the most recently appended block.
    pub fn last(&self) -> &Block {
        self.chain.last()
    }

    /// Get the genesis block.
    pub fn genesis(&self) -> &Block {
        self.chain.first()
    }

    /// Number of blocks in the history, including the genesis block.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Height of the most recently appended block.
    pub fn height(&self) -> Height {
        self.chain.tail.len() as Height
    }

    /// Iterate over the history, starting from genesis.
    pub fn iter(&self) -> Iter<'_, Block> {
        Iter::new(&self.chain)
    }

    /// Record the primary work package's retarget factor on the block at
    /// the given height.
    pub fn record_primary_factor(&mut self, height: Height, factor: f64) -> Result<(), Error> {
        let len = self.len();
        let block = self
            .chain
            .get_mut(height as usize)
            .ok_or(Error::OutOfRange { height, len })?;

        block.record_primary_factor(factor);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_get() {
        let mut history = BlockHistory::new(Block::genesis(0, 1));

        assert_eq!(history.len(), 1);
        assert_eq!(history.height(), 0);

        let height = history.append(Block::new(60, vec![5]));
        assert_eq!(height, 1);
        assert_eq!(history.len(), 2);
        assert_eq!(history.get(1).unwrap().pow(0), Some(5));
        assert_eq!(history.last().time(), 60);
        assert_eq!(history.genesis().time(), 0);
    }

    #[test]
    fn test_out_of_range() {
        let history = BlockHistory::new(Block::genesis(0, 1));

        assert_eq!(
            history.get(1),
            Err(Error::OutOfRange { height: 1, len: 1 })
        );
    }

    #[test]
    fn test_iter_is_double_ended() {
        let mut history = BlockHistory::new(Block::genesis(0, 1));
        history.append(Block::new(60, vec![1]));
        history.append(Block::new(120, vec![2]));

        let backward: Vec<_> = history.iter().rev().map(|(h, _)| h).collect();
        assert_eq!(backward, vec![2, 1, 0]);
    }

    #[test]
    fn test_record_primary_factor() {
        let mut history = BlockHistory::new(Block::genesis(0, 1));
        history.append(Block::new(60, vec![1]));

        history.record_primary_factor(1, 0.5).unwrap();
        assert_eq!(history.get(1).unwrap().primary_factor(), Some(0.5));

        assert_eq!(
            history.record_primary_factor(2, 0.5),
            Err(Error::OutOfRange { height: 2, len: 2 })
        );
    }
}
