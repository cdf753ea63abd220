//! Keyed read cache, retry policy and write commands shared by every view.

mod cache;
mod client;
mod clock;
mod key;
mod mutation;
mod retry;

pub use cache::{Lookup, QueryCache, DEFAULT_STALE_TIME};
pub use client::{QueryClient, COMMENT_PAGE_SIZE, RECENT_REVIEWS_SIZE};
pub use clock::{Clock, ManualClock, SystemClock};
pub use key::QueryKey;
pub use mutation::{Mutation, MutationOutput};
pub use retry::RetryPolicy;
