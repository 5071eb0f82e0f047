//! Builds a [`PushSettings`] from compiled defaults, an optional JSON file,
//! and `MIPUSH_*` variables, each layer overriding the one before.
//!
//! File values are merged key by key over the defaults, so a file holding
//! only `{"appSecret": "..."}` keeps every other default. Lists such as
//! `packageNames` are taken whole from the file, and a `null` leaves the
//! default in place.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::{Result, SettingsError};
use crate::types::{MAX_ATTEMPTS_LIMIT, PushSettings};

/// `~/.mipush/settings.json`, or under `/tmp` when `HOME` is unset.
pub fn settings_path() -> PathBuf {
    let home = std::env::var_os("HOME").map_or_else(|| PathBuf::from("/tmp"), PathBuf::from);
    home.join(".mipush").join("settings.json")
}

/// Settings from [`settings_path`] plus the environment.
pub fn load_settings() -> Result<PushSettings> {
    load_settings_from_path(&settings_path())
}

/// Settings from `path` plus the environment.
///
/// A missing file is not an error; the defaults are used instead.
pub fn load_settings_from_path(path: &Path) -> Result<PushSettings> {
    let mut settings = load_file_layer(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Defaults overlaid with the file at `path`; the environment is not read.
pub fn load_file_layer(path: &Path) -> Result<PushSettings> {
    let mut layered = serde_json::to_value(PushSettings::default())?;

    if path.exists() {
        debug!(?path, "reading push settings file");
        let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: Value = serde_json::from_str(&raw)?;
        layered = deep_merge(layered, file);
    } else {
        debug!(?path, "no push settings file, using defaults");
    }

    Ok(serde_json::from_value(layered)?)
}

/// Overlay `overlay` onto `base`.
///
/// Objects merge per key; any other overlay value replaces the base value,
/// except `null`, which is skipped.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut fields), Value::Object(overrides)) => {
            for (key, value) in overrides {
                if value.is_null() {
                    continue;
                }
                let merged = match fields.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                let _ = fields.insert(key, merged);
            }
            Value::Object(fields)
        }
        (_, overlay) => overlay,
    }
}

/// Apply `MIPUSH_*` environment variable overrides to loaded settings.
pub fn apply_env_overrides(settings: &mut PushSettings) {
    apply_overrides_from(settings, |name| std::env::var(name).ok());
}

/// Same as [`apply_env_overrides`], reading variables through `lookup`.
///
/// An empty variable counts as unset. `MIPUSH_PACKAGE_NAMES` is a comma
/// separated list. A number that does not parse or is out of range is
/// logged and the earlier layer's value stays.
pub fn apply_overrides_from(settings: &mut PushSettings, lookup: impl Fn(&str) -> Option<String>) {
    let read = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(v) = read("MIPUSH_APP_SECRET") {
        settings.app_secret = v;
    }
    if let Some(v) = read("MIPUSH_PACKAGE_NAMES") {
        settings.package_names = parse_list(&v);
    }
    if let Some(v) = read("MIPUSH_HOST") {
        settings.host = v;
    }
    if let Some(v) = read("MIPUSH_FEEDBACK_HOST") {
        settings.feedback_host = v;
    }
    if let Some(v) = read("MIPUSH_TIMEOUT_MS") {
        match parse_u64_range(&v, 1000, 600_000) {
            Some(ms) => settings.request_timeout_ms = ms,
            None => tracing::warn!(key = "MIPUSH_TIMEOUT_MS", value = %v, "invalid u64 env var, ignoring"),
        }
    }
    if let Some(v) = read("MIPUSH_MAX_ATTEMPTS") {
        match parse_u32_range(&v, 1, MAX_ATTEMPTS_LIMIT) {
            Some(n) => settings.max_attempts = n,
            None => tracing::warn!(key = "MIPUSH_MAX_ATTEMPTS", value = %v, "invalid u32 env var, ignoring"),
        }
    }
}

// ── Value parsing ───────────────────────────────────────────────────────────

/// Split a comma-separated list, trimming entries and dropping blanks.
pub fn parse_list(val: &str) -> Vec<String> {
    val.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a string as a `u32` within a range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
