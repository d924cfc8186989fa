//! Environment variable expansion for configuration values.

use crate::ConfigError;

/// Variable lookup failure passed back through `shellexpand`.
struct LookupError {
    var_name: String,
}

/// Expand `${VAR}` references in a configuration value.
///
/// Values without `${` pass through untouched, so expansion costs nothing
/// for the common case.
pub(crate) fn expand_value(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var: &str| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(|cow| cow.into_owned())
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_value_without_references() {
        let result = expand_value("http://localhost:7878", "site.url").unwrap();
        assert_eq!(result, "http://localhost:7878");
    }

    #[test]
    fn test_expand_value_substitutes_variable() {
        // SAFETY: test runs single-threaded per test function
        unsafe { std::env::set_var("WAYMARK_TEST_EXPAND_HOST", "docs.example.com") };

        let result = expand_value("https://${WAYMARK_TEST_EXPAND_HOST}", "site.url").unwrap();
        assert_eq!(result, "https://docs.example.com");
    }

    #[test]
    fn test_expand_value_missing_variable_errors() {
        let err = expand_value("https://${WAYMARK_TEST_EXPAND_UNSET}", "site.url").unwrap_err();

        let ConfigError::EnvVar { field, message } = err else {
            panic!("expected EnvVar error");
        };
        assert_eq!(field, "site.url");
        assert!(message.contains("WAYMARK_TEST_EXPAND_UNSET"));
    }
}
