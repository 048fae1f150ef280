//! Runtime configuration for apicheck.
//!
//! The module exposes the `strict_uuid` flag controlling whether `<uuid>`
//! placeholders in expected templates require the textual UUID form.

use std::sync::atomic::{AtomicU8, Ordering};

use apicheck_json::CompareOptions;

const OVERRIDE_UNSET: u8 = 0;
const OVERRIDE_FALSE: u8 = 1;
const OVERRIDE_TRUE: u8 = 2;

/// Environment variable read when no in-process override is set.
pub const STRICT_UUID_ENV: &str = "APICHECK_STRICT_UUID";

static STRICT_UUID_OVERRIDE: AtomicU8 = AtomicU8::new(OVERRIDE_UNSET);

fn parse_env_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "Yes" | "on" | "ON" | "On" => Some(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "No" | "off" | "OFF" | "Off" => {
            Some(false)
        }
        _ => None,
    }
}

fn env_strict_uuid() -> Option<bool> {
    std::env::var(STRICT_UUID_ENV)
        .ok()
        .as_deref()
        .and_then(parse_env_bool)
}

fn override_state() -> Option<bool> {
    match STRICT_UUID_OVERRIDE.load(Ordering::Relaxed) {
        OVERRIDE_FALSE => Some(false),
        OVERRIDE_TRUE => Some(true),
        _ => None,
    }
}

/// Determine whether `<uuid>` placeholders are validated strictly.
///
/// The in-process override wins over the environment; both default to
/// `false`, which accepts any non-empty string.
#[must_use]
pub fn strict_uuid() -> bool {
    override_state().or_else(env_strict_uuid).unwrap_or(false)
}

/// Override the `strict_uuid` flag for the current process.
///
/// Tests may call [`clear_strict_uuid_override`] to restore environment
/// driven behaviour after toggling the override.
pub fn set_strict_uuid(enabled: bool) {
    let value = if enabled {
        OVERRIDE_TRUE
    } else {
        OVERRIDE_FALSE
    };
    STRICT_UUID_OVERRIDE.store(value, Ordering::Relaxed);
}

/// Remove any in-process override for the `strict_uuid` flag.
pub fn clear_strict_uuid_override() {
    STRICT_UUID_OVERRIDE.store(OVERRIDE_UNSET, Ordering::Relaxed);
}

/// Comparison options reflecting the current configuration.
#[must_use]
pub fn compare_options() -> CompareOptions {
    CompareOptions {
        strict_uuid: strict_uuid(),
    }
}
