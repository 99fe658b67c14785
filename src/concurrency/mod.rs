//! Concurrency control shared across the pipeline: bounded adapter calls,
//! cooperative cancellation, single-flight caching, rate limiting, retry.

mod bounded;
mod cache;
mod cancel;
mod rate_limit;
mod retry;

pub use bounded::BoundedAdapter;
pub use cache::SingleFlightCache;
pub use cancel::CancellationToken;
pub use rate_limit::RateLimiter;
pub use retry::retry_with_backoff;
