//! Environment-variable parsing helpers.
//!
//! Each helper takes a `lookup` function rather than reading the process
//! environment directly, so config types can be built from a plain map in
//! tests. Binaries pass [`process_env`].

use std::fmt::Display;
use std::str::FromStr;

use crate::error::CoreError;

/// Read a variable from the process environment.
///
/// Empty values are treated as unset.
pub fn process_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

/// Fetch a variable that has no default.
pub fn required<F>(lookup: &F, var: &'static str) -> Result<String, CoreError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var).ok_or(CoreError::MissingEnv(var))
}

/// Fetch a string variable, falling back to `default`.
pub fn string_or<F>(lookup: &F, var: &'static str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var).unwrap_or_else(|| default.to_string())
}

/// Fetch and parse a variable, falling back to `default` when unset.
///
/// A value that is present but does not parse is an error, never a silent
/// fallback.
pub fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, CoreError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| CoreError::InvalidEnv {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

/// Fetch a boolean flag. Accepts `true/false`, `1/0`, `yes/no`, `on/off`.
pub fn bool_or<F>(lookup: &F, var: &'static str, default: bool) -> Result<bool, CoreError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(CoreError::InvalidEnv {
            var,
            value: raw,
            reason: "expected a boolean".to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
