use std::{num::NonZeroU32, sync::Arc};

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};

/// Per-chain RPC throttle.
///
/// Every reader and writer built for a chain shares one limiter, so the
/// configured quota covers all requests against that chain regardless of how
/// many clients are alive.
#[derive(Clone, Default)]
pub(crate) struct RpcRateLimiter {
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl RpcRateLimiter {
    /// `None` (or zero) means unlimited.
    pub(crate) fn per_second(requests_per_second: Option<u32>) -> Self {
        let limiter = requests_per_second
            .and_then(NonZeroU32::new)
            .map(|rps| Arc::new(RateLimiter::direct(Quota::per_second(rps))));

        Self { limiter }
    }

    pub(crate) async fn acquire(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}
