//! Block history storage and work-package retargeting.
#[allow(clippy::len_without_is_empty)]
#[deny(
    unsafe_code,
    missing_debug_implementations,
    missing_copy_implementations
)]
pub mod block;

pub mod feed;
pub mod retarget;
