//! Mode routing
//!
//! - Server mode (HTTP server, the default)
//! - CLI mode (`config`, `token` subcommands)

pub mod cli;
pub mod server;

pub use cli::{run_config_command, run_token_command};
pub use server::run_server;
