pub mod auth;
pub mod rate_limit;
pub mod response;

pub use auth::{require_auth, require_credential, AuthUser};
pub use rate_limit::{client_ip, rate_limit_middleware, NoopLimiter, RateLimiter, SlidingWindowLimiter};
pub use response::{ApiResponse, ApiResult};
