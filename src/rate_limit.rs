use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;

/// Requests allowed per client per minute when nothing else is configured
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 5;

/// Per-client request limiter for the HTTP API
pub struct ClientRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    per_minute: NonZeroU32,
}

impl ClientRateLimiter {
    /// A limit of 0 is raised to 1
    pub fn per_minute(requests: u32) -> Self {
        let per_minute = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
            per_minute,
        }
    }

    pub fn limit(&self) -> u32 {
        self.per_minute.get()
    }

    /// Records one request for `client` and returns whether it is allowed
    pub fn check(&self, client: &str) -> bool {
        let allowed = self.limiter.check_key(&client.to_string()).is_ok();
        if !allowed {
            tracing::warn!(client = %client, limit = self.limit(), "Rate limit exceeded");
        }
        // Forget clients whose quota has fully replenished
        self.limiter.retain_recent();
        allowed
    }
}

impl Default for ClientRateLimiter {
    fn default() -> Self {
        Self::per_minute(DEFAULT_REQUESTS_PER_MINUTE)
    }
}
