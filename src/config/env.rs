use std::env;
use crate::error::{Result, TdbError};

/// Environment variable configuration constants
pub struct EnvVars;

impl EnvVars {
    pub const TOUHOUDB_URL: &'static str = "TOUHOUDB_URL";
    pub const WIKI_API_URL: &'static str = "TOUHOUDB_WIKI_API_URL";
    pub const USER_AGENT: &'static str = "TOUHOUDB_USER_AGENT";
    pub const REQUEST_TIMEOUT_SECONDS: &'static str = "TOUHOUDB_REQUEST_TIMEOUT_SECONDS";
    pub const INCLUDE_LYRICS: &'static str = "TOUHOUDB_INCLUDE_LYRICS";
    pub const CIRCLE_SEARCH_MAX_RESULTS: &'static str = "TOUHOUDB_CIRCLE_SEARCH_MAX_RESULTS";
    pub const ALLOW_BASE_VOICEBANKS: &'static str = "TOUHOUDB_ALLOW_BASE_VOICEBANKS";
}

/// Environment variable parsing utilities with validation
pub struct EnvParser;

impl EnvParser {
    /// Parse environment variable as string with validation
    pub fn parse_string(var_name: &str, validator: Option<fn(&str) -> Result<()>>) -> Result<Option<String>> {
        match env::var(var_name) {
            Ok(value) => {
                let trimmed = value.trim().to_string();
                if trimmed.is_empty() {
                    return Ok(None);
                }

                if let Some(validate_fn) = validator {
                    validate_fn(&trimmed)?;
                }

                Ok(Some(trimmed))
            }
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(TdbError::Validation(format!(
                "Environment variable {} contains invalid UTF-8",
                var_name
            ))),
        }
    }

    /// Parse environment variable as boolean with validation
    pub fn parse_bool(var_name: &str) -> Result<Option<bool>> {
        if let Some(value_str) = Self::parse_string(var_name, None)? {
            match value_str.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Some(true)),
                "false" | "0" | "no" | "off" => Ok(Some(false)),
                _ => Err(TdbError::Validation(format!(
                    "Invalid boolean value in {}: '{}'. Use: true/false, 1/0, yes/no, on/off",
                    var_name, value_str
                ))),
            }
        } else {
            Ok(None)
        }
    }

    /// Parse environment variable as u64 with range validation
    pub fn parse_u64(var_name: &str, min: u64, max: u64) -> Result<Option<u64>> {
        if let Some(value_str) = Self::parse_string(var_name, None)? {
            let value = value_str.parse::<u64>().map_err(|_| {
                TdbError::Validation(format!(
                    "Invalid number in {}: '{}'. Must be a positive integer",
                    var_name, value_str
                ))
            })?;

            if value < min || value > max {
                return Err(TdbError::Validation(format!(
                    "Value in {} must be between {} and {}, got {}",
                    var_name, min, max, value
                )));
            }

            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    /// All TOUHOUDB_ variables currently set, for `config show`
    pub fn get_all_touhoudb_vars() -> Vec<(String, String)> {
        let mut vars: Vec<(String, String)> = env::vars()
            .filter(|(key, _)| key.starts_with("TOUHOUDB_"))
            .collect();
        vars.sort();
        vars
    }
}
