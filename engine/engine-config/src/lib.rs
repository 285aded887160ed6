//! Centralized configuration loading from config.toml.
//!
//! This crate provides the configuration structs and loading logic used by
//! the web service.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`UTTT_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! UTTT_<SECTION>_<KEY>=value
//!
//! Examples:
//!     UTTT_COMMON_LOG_LEVEL=debug
//!     UTTT_WEB_HOST=127.0.0.1
//!     UTTT_WEB_PORT=8080
//!     UTTT_WEB_ALLOWED_ORIGINS=http://localhost:3000,https://example.com
//!     UTTT_MCTS_TIME_BUDGET_MS=1000
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_from_path, CONFIG_PATH_ENV, CONFIG_SEARCH_PATHS,
};
pub use structs::*;
