mod r#impl;
mod structs;
pub mod validators;

pub use r#impl::{
    DEFAULT_CONFIG_PATH, get_config, init_config, init_config_from, init_config_with,
    update_config,
};
pub use structs::*;
pub use validators::validate_static_config;
