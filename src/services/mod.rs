//! Service layer for business logic
//!
//! Shared by the HTTP handlers and the CLI.

mod engagement_service;
mod post_service;
mod profile_service;
pub mod short_code;

pub use engagement_service::*;
pub use post_service::*;
pub use profile_service::*;
pub use short_code::{RandomCodeGenerator, ShortCodeGenerator};
