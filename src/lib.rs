//! Gravwell is a difficulty retargeting engine for blockchains that mine
//! multiple concurrent *work packages*: independent proof-of-work lanes
//! within the same chain, each with its own mining target.
//!
//! The project is broken down into the following crates:
//!
//! * [`chain`]: the block history store and the retargeting engine
//! * [`common`]: common functionality used by all crates
//!
//! The [`chain`] crate is intended to be the entry point for most users of
//! the library, and is a good place to start, to see how everything fits
//! together.

pub use gravwell_chain as chain;
pub use gravwell_common as common;
