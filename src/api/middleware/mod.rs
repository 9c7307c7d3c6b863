pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod timing;

pub use auth::{AdminAuth, AuthenticatedAdmin};
pub use rate_limit::{ClientIpKeyExtractor, RateLimiters};
pub use request_id::{RequestId, RequestIdMiddleware};
pub use timing::TimingMiddleware;
