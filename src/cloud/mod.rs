//! External cloud CLI boundary: `check`/`download` with a fixed retry
//! ladder.

mod adapter;
mod retry;

/// A scriptable [`CloudAdapter`] test double. Only built for this crate's
/// own unit tests or when the `test-util` feature is enabled — production
/// builds of `voice_poller` do not carry it.
#[cfg(any(test, feature = "test-util"))]
pub mod stub;

pub use adapter::{CloudAdapter, CloudError, IcloudctlAdapter};
pub use retry::{MAX_ATTEMPTS, WALL_CLOCK_BUDGET};
