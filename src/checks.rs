//! PDB identifier and resource name checks.

use std::sync::OnceLock;

use regex::Regex;
use tracing::error;

use crate::error::PreconditionError;
use crate::types::RESOURCES;

/// Four alphanumeric characters, the first of which is not `0`.
const PDB_ID_PATTERN: &str = r"^[1-9a-zA-Z][a-zA-Z0-9]{3}$";

static PDB_ID_REGEX: OnceLock<Regex> = OnceLock::new();

fn pdb_id_regex() -> &'static Regex {
    PDB_ID_REGEX.get_or_init(|| Regex::new(PDB_ID_PATTERN).expect("PDB id pattern is valid"))
}

/// Check that a PDB identifier is present and well formed.
///
/// # Errors
///
/// Returns `PreconditionError::MissingIdentifier` for an absent or empty id
/// and `PreconditionError::MalformedIdentifier` if it fails the pattern.
pub fn check_identifier(id: Option<&str>) -> Result<(), PreconditionError> {
    let id = match id {
        Some(id) if !id.is_empty() => id,
        _ => return Err(PreconditionError::MissingIdentifier),
    };
    if pdb_id_regex().is_match(id) {
        Ok(())
    } else {
        Err(PreconditionError::MalformedIdentifier { id: id.to_string() })
    }
}

/// Check that a resource name is present and registered.
///
/// # Errors
///
/// Returns `PreconditionError::MissingResource` for an absent or empty name
/// and `PreconditionError::UnknownResource` if it is not registered.
pub fn check_resource(name: Option<&str>) -> Result<(), PreconditionError> {
    let name = match name {
        Some(name) if !name.is_empty() => name,
        _ => return Err(PreconditionError::MissingResource),
    };
    if RESOURCES.contains(&name) {
        Ok(())
    } else {
        Err(PreconditionError::UnknownResource {
            name: name.to_string(),
        })
    }
}

/// Returns true if `id` is a valid PDB identifier, logging the reason otherwise.
pub fn is_valid_identifier(id: Option<&str>) -> bool {
    check_identifier(id)
        .map_err(|e| error!(reason = %e, "identifier check failed"))
        .is_ok()
}

/// Returns true if `name` is a known resource, logging the reason otherwise.
pub fn is_known_resource(name: Option<&str>) -> bool {
    check_resource(name)
        .map_err(|e| error!(reason = %e, "resource check failed"))
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_identifiers() {
        for id in ["1abc", "9ZZZ", "1A2b", "2xyz"] {
            assert!(is_valid_identifier(Some(id)), "{id} should be valid");
        }
    }

    #[test]
    fn wrong_length_rejected() {
        for id in ["1ab", "1abcd", "1", "12345678"] {
            assert!(!is_valid_identifier(Some(id)), "{id} should be invalid");
        }
    }

    #[test]
    fn leading_zero_rejected() {
        assert!(!is_valid_identifier(Some("0abc")));
        assert!(!is_valid_identifier(Some("0000")));
    }

    #[test]
    fn non_alphanumeric_rejected() {
        for id in ["1ab-", "1a c", "1ab_", "1éab"] {
            assert!(!is_valid_identifier(Some(id)), "{id} should be invalid");
        }
    }

    #[test]
    fn missing_and_malformed_identifier_are_distinct() {
        assert!(matches!(
            check_identifier(None),
            Err(PreconditionError::MissingIdentifier)
        ));
        assert!(matches!(
            check_identifier(Some("")),
            Err(PreconditionError::MissingIdentifier)
        ));
        assert!(matches!(
            check_identifier(Some("abc")),
            Err(PreconditionError::MalformedIdentifier { .. })
        ));
    }

    #[test]
    fn every_registered_resource_is_known() {
        for name in RESOURCES {
            assert!(is_known_resource(Some(*name)), "{name} should be known");
        }
    }

    #[test]
    fn unknown_resources_rejected() {
        for name in ["", "NOD", "cath", "funsites", "nod "] {
            assert!(!is_known_resource(Some(name)), "{name:?} should be unknown");
        }
        assert!(!is_known_resource(None));
    }

    #[test]
    fn missing_and_unknown_resource_are_distinct() {
        assert!(matches!(
            check_resource(None),
            Err(PreconditionError::MissingResource)
        ));
        assert!(matches!(
            check_resource(Some("foo")),
            Err(PreconditionError::UnknownResource { .. })
        ));
    }
}
