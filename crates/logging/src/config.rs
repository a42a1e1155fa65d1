//! crates/logging/src/config.rs
//! Debug configuration read from the environment.

use std::env;

use super::levels::{DebugFlag, DebugLevels};

/// Environment variable that switches native debug output on.
pub const DEBUG_ENV: &str = "OSCALLS_DEBUG_NATIVE";

/// Debug configuration for every category.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct LogConfig {
    /// Debug levels per category.
    pub debug: DebugLevels,
    /// Tokens that could not be applied, with the reason.
    pub rejected: Vec<String>,
}

impl LogConfig {
    /// Reads [`DEBUG_ENV`] from the process environment.
    pub fn from_env() -> Self {
        let value = env::var_os(DEBUG_ENV).map(|raw| raw.to_string_lossy().into_owned());
        Self::parse(value.as_deref())
    }

    /// Builds a configuration from the raw toggle value.
    ///
    /// - unset, `0`, `false`, `off`: silent
    /// - empty, `1`, `true`, `on`, `all`: every category at level 1
    /// - a number `N`: every category at level `N`
    /// - otherwise a comma separated token list such as `acl2,xattr`
    pub fn parse(value: Option<&str>) -> Self {
        let mut config = Self::default();
        let Some(value) = value.map(str::trim) else {
            return config;
        };

        match value.to_ascii_lowercase().as_str() {
            "0" | "false" | "off" => {}
            "" | "true" | "on" | "all" => config.debug.set_all(1),
            other => {
                if let Ok(level) = other.parse::<u8>() {
                    config.debug.set_all(level);
                    return config;
                }
                for token in other.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                    if let Err(reason) = config.apply_debug_flag(token) {
                        config.rejected.push(reason);
                    }
                }
            }
        }

        config
    }

    /// Creates a configuration with every category at `level`.
    pub fn all(level: u8) -> Self {
        let mut config = Self::default();
        config.debug.set_all(level);
        config
    }

    /// Apply a single debug flag token (e.g., "acl2", "xattr", "all3").
    pub fn apply_debug_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;

        if name == "all" {
            self.debug.set_all(level);
            return Ok(());
        }

        let flag =
            DebugFlag::from_name(name).ok_or_else(|| format!("unknown debug flag: {name}"))?;
        self.debug.set(flag, level);
        Ok(())
    }

    /// Returns `true` when any category produces output.
    pub fn is_enabled(&self) -> bool {
        self.debug.any()
    }
}

/// Parse a flag token like "acl2" into ("acl", 2) or "xattr" into ("xattr", 1).
fn parse_flag_token(token: &str) -> Result<(&str, u8), String> {
    if token.is_empty() {
        return Err("empty flag token".to_string());
    }

    match token.find(|c: char| c.is_ascii_digit()) {
        Some(0) => Err(format!("missing flag name in: {token}")),
        Some(pos) => {
            let level = token[pos..]
                .parse::<u8>()
                .map_err(|_| format!("invalid level in flag: {token}"))?;
            Ok((&token[..pos], level))
        }
        None => Ok((token, 1)),
    }
}
