/*!
 * Kernel Configuration
 *
 * Runtime knobs for the syscall boundary. Defaults match the fixed ABI in
 * `limits`; every field can be overridden from the environment or from a
 * JSON document.
 */

use super::limits::{MAX_USER_STRING, PHYS_BASE};
use super::types::Address;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Environment variable selecting the unknown-syscall policy
pub const ENV_UNKNOWN_SYSCALL: &str = "TRAPGATE_UNKNOWN_SYSCALL";
/// Environment variable overriding the user address ceiling
pub const ENV_USER_LIMIT: &str = "TRAPGATE_USER_LIMIT";
/// Environment variable overriding the user string cap
pub const ENV_MAX_STRING: &str = "TRAPGATE_MAX_STRING";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Malformed configuration document: {0}")]
    Malformed(String),
}

/// What the dispatcher does with a syscall number outside the fixed table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownSyscallPolicy {
    /// Leave the process running and report 0 in the return slot
    #[default]
    ReturnZero,
    /// Treat the request as a protocol violation and kill the caller with -1
    Terminate,
}

impl FromStr for UnknownSyscallPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "return-zero" | "zero" => Ok(Self::ReturnZero),
            "terminate" | "kill" => Ok(Self::Terminate),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_UNKNOWN_SYSCALL,
                value: s.to_string(),
            }),
        }
    }
}

/// Syscall boundary configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct KernelConfig {
    /// Policy for numbers outside the 13 known syscalls
    pub unknown_syscall: UnknownSyscallPolicy,
    /// First address that is not user-reachable
    pub user_limit: Address,
    /// Longest user string copied in, including the NUL
    pub max_string_len: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            unknown_syscall: UnknownSyscallPolicy::default(),
            user_limit: PHYS_BASE,
            max_string_len: MAX_USER_STRING,
        }
    }
}

impl KernelConfig {
    /// Build a configuration from defaults overridden by environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var(ENV_UNKNOWN_SYSCALL) {
            config.unknown_syscall = value.parse()?;
        }
        if let Ok(value) = std::env::var(ENV_USER_LIMIT) {
            config.user_limit = parse_address(&value).ok_or(ConfigError::InvalidValue {
                key: ENV_USER_LIMIT,
                value,
            })?;
        }
        if let Ok(value) = std::env::var(ENV_MAX_STRING) {
            config.max_string_len = value
                .trim()
                .parse()
                .ok()
                .filter(|len| *len > 0)
                .ok_or(ConfigError::InvalidValue {
                    key: ENV_MAX_STRING,
                    value,
                })?;
        }

        Ok(config)
    }

    /// Parse a JSON configuration document; missing fields keep their defaults
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(document).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    #[inline]
    #[must_use]
    pub fn with_unknown_syscall(mut self, policy: UnknownSyscallPolicy) -> Self {
        self.unknown_syscall = policy;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_user_limit(mut self, limit: Address) -> Self {
        self.user_limit = limit;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_max_string_len(mut self, len: usize) -> Self {
        self.max_string_len = len;
        self
    }
}

/// Accepts `0x`-prefixed hex or plain decimal
fn parse_address(value: &str) -> Option<Address> {
    let value = value.trim();
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => Address::from_str_radix(&hex.replace('_', ""), 16).ok(),
        None => value.parse().ok(),
    }
}
