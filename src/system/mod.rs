//! System-level modules
//!
//! Currently only logging initialization lives here; lifecycle and
//! execution modes are under `runtime`.

pub mod logging;
