//! # mipush-settings
//!
//! App secret, package names, hosts and retry limits for the Xiaomi push
//! client. [`load_settings`] starts from [`PushSettings::default()`], merges
//! `~/.mipush/settings.json` over it, then applies `MIPUSH_*` variables.
//!
//! # Usage
//!
//! ```no_run
//! use mipush_settings::load_settings;
//!
//! let settings = load_settings().unwrap();
//! println!("host: {}", settings.host);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, deep_merge, load_settings, load_settings_from_path, settings_path,
};
pub use types::{DEFAULT_REQUEST_TIMEOUT_MS, PushSettings};

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
