//! Deposition documents: loading, schema validation and normalization.
//!
//! A document is a JSON object describing functional annotations of one PDB
//! entry. The fields this crate looks at directly are `pdb_id`,
//! `data_resource` and the `source_database` of each element of `sites`;
//! everything else is left to the schema.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{PreconditionError, ValidateError, Violation};
use crate::types::{PDB_ID_FIELD, RESOURCE_FIELD};

/// Load a document from a file path.
///
/// The file is read fully and closed before parsing.
///
/// # Errors
///
/// Returns `PreconditionError::FileNotFound` if the file doesn't exist,
/// `PreconditionError::ReadError` if it cannot be read,
/// or `PreconditionError::InvalidJson` if the file isn't valid JSON.
pub fn load_document(path: &Path) -> Result<Value, PreconditionError> {
    if !path.exists() {
        return Err(PreconditionError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| PreconditionError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    let document = serde_json::from_str(&content).map_err(|source| {
        PreconditionError::InvalidJson {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!(path = %path.display(), "JSON parsed");
    Ok(document)
}

/// Returns the document's `pdb_id`, if it is a string.
pub fn pdb_id(document: &Value) -> Option<&str> {
    document.get(PDB_ID_FIELD).and_then(Value::as_str)
}

/// Returns the document's `data_resource`, if it is a string.
pub fn data_resource(document: &Value) -> Option<&str> {
    document.get(RESOURCE_FIELD).and_then(Value::as_str)
}

/// Returns true if the document conforms to the schema.
///
/// An absent schema or an absent or empty document fails without running
/// the schema check.
pub fn validate(document: Option<&Value>, schema: Option<&Value>) -> bool {
    let (Some(document), Some(schema)) = (document, schema) else {
        return false;
    };
    if is_empty(document) {
        return false;
    }

    match validate_against_schema(schema, document) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "JSON does not comply with schema");
            false
        }
    }
}

fn is_empty(document: &Value) -> bool {
    match document {
        Value::Null => true,
        Value::Object(fields) => fields.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Validate a document against a schema, collecting every violation.
///
/// # Errors
///
/// Returns `ValidateError::InvalidSchema` if the schema cannot be compiled,
/// or `ValidateError::Invalid` if the document doesn't match the schema.
pub fn validate_against_schema(schema: &Value, document: &Value) -> Result<(), ValidateError> {
    let validator = jsonschema::validator_for(schema).map_err(|e| ValidateError::InvalidSchema {
        message: e.to_string(),
    })?;

    let errors: Vec<Violation> = validator
        .iter_errors(document)
        .map(|e| Violation {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::Invalid { errors })
    }
}

/// Lower-case `pdb_id` and every `sites[].source_database` in place.
///
/// Sites without `source_database` and non-string values are left alone.
pub fn normalize(document: &mut Value) {
    if let Some(sites) = document.get_mut("sites").and_then(Value::as_array_mut) {
        for site in sites {
            if let Some(source) = site.get_mut("source_database") {
                lowercase_in_place(source);
            }
        }
    }
    if let Some(id) = document.get_mut(PDB_ID_FIELD) {
        lowercase_in_place(id);
    }
}

fn lowercase_in_place(value: &mut Value) {
    if let Value::String(s) = value {
        *s = s.to_lowercase();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn schema() -> Value {
        json!({
            "type": "object",
            "required": ["pdb_id", "data_resource", "sites"],
            "properties": {
                "pdb_id": { "type": "string" },
                "data_resource": { "type": "string" },
                "sites": { "type": "array" }
            }
        })
    }

    #[test]
    fn load_document_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"pdb_id": "1ABC"}}"#).unwrap();

        let document = load_document(file.path()).unwrap();
        assert_eq!(document["pdb_id"], "1ABC");
    }

    #[test]
    fn load_document_file_not_found() {
        let result = load_document(Path::new("/nonexistent/entry.json"));
        assert!(matches!(
            result,
            Err(PreconditionError::FileNotFound { .. })
        ));
    }

    #[test]
    fn load_document_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{ not json").unwrap();

        let result = load_document(file.path());
        assert!(matches!(result, Err(PreconditionError::InvalidJson { .. })));
    }

    #[test]
    fn load_document_directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_document(dir.path());
        assert!(matches!(result, Err(PreconditionError::ReadError { .. })));
    }

    #[test]
    fn field_accessors() {
        let document = json!({ "pdb_id": "1abc", "data_resource": "nod" });
        assert_eq!(pdb_id(&document), Some("1abc"));
        assert_eq!(data_resource(&document), Some("nod"));
        assert_eq!(pdb_id(&json!({ "pdb_id": 1234 })), None);
        assert_eq!(data_resource(&json!({})), None);
    }

    #[test]
    fn validate_without_schema_is_false() {
        let document = json!({ "pdb_id": "1abc", "data_resource": "nod", "sites": [] });
        assert!(!validate(Some(&document), None));
    }

    #[test]
    fn validate_without_document_is_false() {
        assert!(!validate(None, Some(&schema())));
        assert!(!validate(Some(&Value::Null), Some(&schema())));
    }

    #[test]
    fn validate_empty_document_is_false() {
        let permissive = json!({});
        assert!(!validate(Some(&json!({})), Some(&permissive)));
        assert!(!validate(Some(&json!([])), Some(&permissive)));
        assert!(validate(Some(&json!({ "pdb_id": "1abc" })), Some(&permissive)));
    }

    #[test]
    fn validate_conforming_document() {
        let document = json!({ "pdb_id": "1abc", "data_resource": "nod", "sites": [] });
        assert!(validate(Some(&document), Some(&schema())));
    }

    #[test]
    fn validate_missing_required_field() {
        let document = json!({ "pdb_id": "1abc", "sites": [] });
        assert!(!validate(Some(&document), Some(&schema())));
    }

    #[test]
    fn validate_collects_every_violation() {
        let document = json!({ "pdb_id": 1, "data_resource": 2, "sites": [] });
        match validate_against_schema(&schema(), &document) {
            Err(ValidateError::Invalid { errors }) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.iter().any(|e| e.path == "/pdb_id"));
            }
            other => panic!("expected two violations, got {other:?}"),
        }
    }

    #[test]
    fn validate_uncompilable_schema() {
        let bad_schema = json!({ "type": "not-a-type" });
        let result = validate_against_schema(&bad_schema, &json!({}));
        assert!(matches!(result, Err(ValidateError::InvalidSchema { .. })));
    }

    #[test]
    fn normalize_lowercases_id_and_sources() {
        let mut document = json!({
            "pdb_id": "1ABC",
            "sites": [{ "source_database": "FOO" }, {}]
        });
        normalize(&mut document);
        assert_eq!(
            document,
            json!({
                "pdb_id": "1abc",
                "sites": [{ "source_database": "foo" }, {}]
            })
        );
    }

    #[test]
    fn normalize_leaves_other_fields_alone() {
        let mut document = json!({
            "pdb_id": "1ABC",
            "data_resource": "NOD",
            "sites": [{ "source_database": "PDB", "label": "SITE-1" }]
        });
        normalize(&mut document);
        assert_eq!(document["data_resource"], "NOD");
        assert_eq!(document["sites"][0]["label"], "SITE-1");
        assert_eq!(document["sites"][0]["source_database"], "pdb");
    }

    #[test]
    fn normalize_tolerates_missing_fields() {
        let mut document = json!({ "data_resource": "nod" });
        normalize(&mut document);
        assert_eq!(document, json!({ "data_resource": "nod" }));
    }
}
