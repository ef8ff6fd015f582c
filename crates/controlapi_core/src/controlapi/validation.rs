//! Object name validation.
//!
//! Names are checked before an object is admitted into the store. Two
//! grammars exist and are kept as separate predicates:
//!
//! **DNS names**: services, tasks and networks. A name starts with an
//! alphanumeric character, and any run of `-`/`_` separators must be followed
//! by at least one alphanumeric character. At most 63 characters.
//!
//! **Config and secret names**: alphanumeric at both ends, with `-`, `_` and
//! `.` allowed in between. At most 64 characters.
//!
//! Checks run in order and the first failing one is reported.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::controlapi::{error::ControlApiError, types::Annotations};

/// DNS labels are limited to 63 characters.
pub const MAX_DNS_NAME_LEN: usize = 63;

pub const MAX_CONFIG_OR_SECRET_NAME_LEN: usize = 64;

static DNS_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9](?:[-_]*[A-Za-z0-9]+)*$").expect("DNS name grammar compiles")
});

static CONFIG_OR_SECRET_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9]+(?:[a-zA-Z0-9_.-]*[a-zA-Z0-9])?$")
        .expect("config/secret name grammar compiles")
});

/// Returns `true` if `name` matches the DNS name component grammar.
///
/// Length is not checked here, see [`validate_annotations`].
pub fn is_valid_dns_name(name: &str) -> bool {
    DNS_NAME.is_match(name)
}

/// Returns `true` if `name` matches the config/secret grammar.
///
/// Length is not checked here, see [`validate_config_or_secret_annotations`].
pub fn is_valid_config_or_secret_name(name: &str) -> bool {
    CONFIG_OR_SECRET_NAME.is_match(name)
}

/// Validates the annotations of a service, task or network.
///
/// # Errors
/// `InvalidArgument` when the name is empty, does not match the DNS name
/// grammar, or is longer than [`MAX_DNS_NAME_LEN`], checked in that order.
pub fn validate_annotations(annotations: &Annotations) -> Result<(), ControlApiError> {
    let name = annotations.name.as_str();
    if name.is_empty() {
        return Err(ControlApiError::invalid_argument("name must be provided"));
    }
    if !is_valid_dns_name(name) {
        debug!(name = %name, "rejected name, not a DNS name component");
        return Err(ControlApiError::invalid_argument(
            "name must be valid as a DNS name component",
        ));
    }
    if name.len() > MAX_DNS_NAME_LEN {
        debug!(name = %name, len = name.len(), "rejected name, too long");
        return Err(ControlApiError::invalid_argument("name must be 63 characters or fewer"));
    }
    Ok(())
}

/// Validates the annotations of a config or a secret.
///
/// # Errors
/// `InvalidArgument` when the name is empty, or when it is too long or does
/// not match the config/secret grammar (one combined message).
pub fn validate_config_or_secret_annotations(
    annotations: &Annotations,
) -> Result<(), ControlApiError> {
    let name = annotations.name.as_str();
    if name.is_empty() {
        return Err(ControlApiError::invalid_argument("name must be provided"));
    }
    if name.len() > MAX_CONFIG_OR_SECRET_NAME_LEN || !is_valid_config_or_secret_name(name) {
        debug!(name = %name, "rejected config/secret name");
        return Err(ControlApiError::invalid_argument(
            "invalid name, only 64 [a-zA-Z0-9-_.] characters allowed, and the start and end character must be [a-zA-Z0-9]",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(name: &str) -> String {
        validate_annotations(&Annotations::new(name)).unwrap_err().to_string()
    }

    fn config_err(name: &str) -> String {
        validate_config_or_secret_annotations(&Annotations::new(name)).unwrap_err().to_string()
    }

    #[test]
    fn unit_validation_dns_name_accepted() {
        crate::controlapi_tracing::init();
        for name in ["abc", "a-b", "a_b-c", "a", "9", "web01", "A_B", "a-_b", "a--b"] {
            assert!(validate_annotations(&Annotations::new(name)).is_ok(), "{name}");
        }
    }

    #[test]
    fn unit_validation_dns_name_rejected() {
        crate::controlapi_tracing::init();
        for name in ["-abc", "abc-", "_abc", "abc_", "a.b", "a b", "é", "a-", "a/b"] {
            assert_eq!(err(name), "name must be valid as a DNS name component", "{name}");
        }
    }

    #[test]
    fn unit_validation_empty_name_checked_first() {
        assert_eq!(err(""), "name must be provided");
        assert_eq!(config_err(""), "name must be provided");
    }

    #[test]
    fn unit_validation_dns_name_length() {
        let longest = "a".repeat(MAX_DNS_NAME_LEN);
        assert!(validate_annotations(&Annotations::new(longest.clone())).is_ok());

        let too_long = format!("{longest}b");
        assert_eq!(err(&too_long), "name must be 63 characters or fewer");
    }

    #[test]
    fn unit_validation_grammar_checked_before_length() {
        let name = format!("-{}", "a".repeat(70));
        assert_eq!(err(&name), "name must be valid as a DNS name component");
    }

    #[test]
    fn unit_validation_config_name() {
        crate::controlapi_tracing::init();
        for name in ["a", "my.config-1", "secret_v2", "a.b", "ab", "x..y", "A-_.-9"] {
            assert!(validate_config_or_secret_annotations(&Annotations::new(name)).is_ok(), "{name}");
        }

        let expected = "invalid name, only 64 [a-zA-Z0-9-_.] characters allowed, and the start and end character must be [a-zA-Z0-9]";
        for name in [".config", "config.", "-a", "a_", "a b", "a/b", "."] {
            assert_eq!(config_err(name), expected, "{name}");
        }

        let longest = "s".repeat(MAX_CONFIG_OR_SECRET_NAME_LEN);
        assert!(validate_config_or_secret_annotations(&Annotations::new(longest.clone())).is_ok());
        assert_eq!(config_err(&format!("{longest}s")), expected);
    }

    #[test]
    fn unit_validation_grammars_differ() {
        assert!(!is_valid_dns_name("my.config"));
        assert!(is_valid_config_or_secret_name("my.config"));
        assert!(is_valid_dns_name("a--b"));
        assert!(!is_valid_config_or_secret_name("a-"));
    }

    #[test]
    fn unit_validation_is_idempotent() {
        let annotations = Annotations::new("web-frontend");
        assert_eq!(validate_annotations(&annotations), validate_annotations(&annotations));
        let bad = Annotations::new("web-");
        assert_eq!(validate_annotations(&bad), validate_annotations(&bad));
    }
}
