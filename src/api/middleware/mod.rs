pub mod auth;
pub mod request_id;

pub use auth::{Identity, IdentityResolver};
pub use request_id::{RequestId, RequestIdMiddleware};
