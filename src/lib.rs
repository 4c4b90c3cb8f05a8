//! Vistagram - photo sharing backend
//!
//! Posts with images and captions, a paged timeline, likes, and per-user
//! share links resolved through short codes.
//!
//! # Architecture
//! - `storage`: sea-orm backend, ledgers for likes and shares
//! - `services`: engagement, post and profile services
//! - `api`: HTTP handlers, session tokens and middleware
//! - `config`: static configuration (TOML + environment)
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
