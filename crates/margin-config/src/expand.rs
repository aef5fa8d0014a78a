//! Environment variable and home directory expansion for path settings.

use crate::ConfigError;

/// Expand `${VAR}`, `${VAR:-default}` and a leading `~` in a path setting.
///
/// Strings without `${` and without a leading `~` are returned unchanged, so
/// literal `$` in directory names survives.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") && !value.starts_with('~') {
        return Ok(value.to_owned());
    }

    shellexpand::full_with_context(value, home_dir, |var| -> Result<Option<String>, Unset> {
        std::env::var(var).map(Some).map_err(|_| Unset(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

fn home_dir() -> Option<String> {
    std::env::var("HOME").ok()
}

/// Name of a variable that has no value.
struct Unset(String);
