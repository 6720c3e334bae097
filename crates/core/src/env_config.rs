//! Environment variable parsing with warn-level logging for invalid values.

/// Parse an environment variable, falling back to `default`.
///
/// An unset variable yields `default` silently. A set but unparsable value
/// is logged at warn level and also yields `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    let Ok(raw) = std::env::var(var) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(var, value = %raw, default = %default, "invalid env var value, using default");
            default
        },
    }
}
