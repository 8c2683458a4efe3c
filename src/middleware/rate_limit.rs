use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;

/// Key used when a request carries no forwarding headers.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Idle keys are swept once the map grows past this many clients.
const PRUNE_THRESHOLD: usize = 1000;

/// Decides whether one more request from `key` may proceed.
///
/// Handlers receive the limiter through `AppState`, so a shared counter service
/// or a deterministic fake can stand in for the in-process window.
pub trait RateLimiter: Send + Sync {
    fn check(&self, key: &str) -> bool;
}

/// Per-process sliding window. Each instance enforces its own budget; there is
/// no coordination between server replicas.
pub struct SlidingWindowLimiter {
    max_requests: usize,
    window: Duration,
    hits: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl SlidingWindowLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    pub fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut hits = self.hits.lock().unwrap_or_else(PoisonError::into_inner);

        let timestamps = hits.entry(key.to_string()).or_default();
        evict_expired(timestamps, now, self.window);

        if timestamps.len() >= self.max_requests {
            return false;
        }
        timestamps.push_back(now);

        if hits.len() > PRUNE_THRESHOLD {
            let window = self.window;
            hits.retain(|_, timestamps| {
                evict_expired(timestamps, now, window);
                !timestamps.is_empty()
            });
        }

        true
    }

    pub fn tracked_clients(&self) -> usize {
        self.hits.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

fn evict_expired(timestamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = timestamps.front() {
        if now.saturating_duration_since(*oldest) >= window {
            timestamps.pop_front();
        } else {
            break;
        }
    }
}

impl RateLimiter for SlidingWindowLimiter {
    fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }
}

/// Used when rate limiting is switched off in configuration
pub struct NoopLimiter;

impl RateLimiter for NoopLimiter {
    fn check(&self, _key: &str) -> bool {
        true
    }
}

/// First `X-Forwarded-For` hop, then `X-Real-IP`, then [`UNKNOWN_CLIENT`].
pub fn client_ip(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

/// Rejects with 429 before any other work (auth, parsing) happens
pub async fn rate_limit_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let ip = client_ip(request.headers());
    if !state.limiter.check(&ip) {
        tracing::warn!(client = %ip, path = %request.uri().path(), "Rate limit exceeded");
        return ApiError::RateLimited.into_response();
    }
    next.run(request).await
}
