use std::env;
use std::str::FromStr;

/// Reads a variable, treating unset and blank values alike.
pub fn optional_env(env_name: &str) -> Option<String> {
    env::var(env_name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// First variable in `env_names` that is set.
pub fn first_env(env_names: &[&str]) -> Option<String> {
    env_names.iter().find_map(|name| optional_env(name))
}

pub fn parse_env<T>(env_name: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional_env(env_name) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| format!("Invalid value for environment variable '{env_name}': {e}")),
        None => Ok(default),
    }
}

pub fn env_flag(env_name: &str) -> Result<bool, String> {
    match optional_env(env_name).map(|v| v.to_lowercase()) {
        None => Ok(false),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(v) => Err(format!(
            "Invalid boolean for environment variable '{env_name}': {v}"
        )),
    }
}
