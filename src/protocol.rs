//! Wire shapes of the file-management API: request bodies, listing records
//! and the normalization of the two response error encodings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::EntryKind;

/// Request body for one remote action.
///
/// Serializes to the flat parameter set the server handler expects, with the
/// variant name (lowercased) as the `mode` discriminator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ActionRequest {
    AddFolder {
        path: String,
        name: String,
    },
    Rename {
        path: String,
        #[serde(rename = "newPath")]
        new_path: String,
    },
    Copy {
        path: String,
        #[serde(rename = "newPath")]
        new_path: String,
    },
    Compress {
        path: String,
        destination: String,
    },
    Extract {
        path: String,
        #[serde(rename = "sourceFile")]
        source_file: String,
        destination: String,
    },
    EditFile {
        path: String,
    },
    Delete {
        path: String,
    },
    SaveFile {
        content: String,
        path: String,
    },
    ChangePermissions {
        path: String,
        perms: String,
        #[serde(rename = "permsCode")]
        perms_code: String,
        recursive: bool,
    },
}

/// One entry of a server directory listing. Every field is optional on the
/// wire; absent fields take their empty defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub rights: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "webPath")]
    pub web_path: String,
}

/// A response body normalized into success or a domain error.
#[derive(Debug, Clone, PartialEq)]
pub enum Interpreted {
    /// No error encoding present; the raw body is the success payload.
    Success(Value),
    /// The body carried one of the two API error encodings.
    Failure(String),
}

/// Normalize a response body.
///
/// The nested `result.error` encoding is checked before the top-level
/// `error.message` encoding; only then is the body a success. Any truthy
/// error value counts as a failure, not just strings; servers have been
/// seen sending booleans and objects there.
pub fn interpret(body: Value) -> Interpreted {
    if let Some(message) = body.pointer("/result/error").and_then(error_message) {
        return Interpreted::Failure(message);
    }
    if let Some(message) = body.pointer("/error/message").and_then(error_message) {
        return Interpreted::Failure(message);
    }
    Interpreted::Success(body)
}

/// Message carried by an error field, if the field is truthy.
///
/// Falsy values (`null`, `false`, `0`, `""`) mean "no error"; non-string
/// truthy values are stringified so the UI still gets something readable.
pub(crate) fn error_message(value: &Value) -> Option<String> {
    let truthy = match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    };
    if !truthy {
        return None;
    }
    Some(match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_mode_discriminators() {
        let cases = vec![
            (
                ActionRequest::AddFolder {
                    path: "a/b".into(),
                    name: "c".into(),
                },
                "addfolder",
            ),
            (
                ActionRequest::EditFile { path: "/a".into() },
                "editfile",
            ),
            (
                ActionRequest::Delete { path: "/a".into() },
                "delete",
            ),
            (
                ActionRequest::SaveFile {
                    content: String::new(),
                    path: "/a".into(),
                },
                "savefile",
            ),
            (
                ActionRequest::ChangePermissions {
                    path: "/a".into(),
                    perms: "644".into(),
                    perms_code: "rw-r--r--".into(),
                    recursive: false,
                },
                "changepermissions",
            ),
        ];
        for (request, mode) in cases {
            let body = serde_json::to_value(&request).unwrap();
            assert_eq!(body["mode"], mode);
        }
    }

    #[test]
    fn test_rename_wire_fields() {
        let request = ActionRequest::Rename {
            path: "/old.txt".into(),
            new_path: "/new.txt".into(),
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({"mode": "rename", "path": "/old.txt", "newPath": "/new.txt"})
        );
    }

    #[test]
    fn test_extract_wire_fields() {
        let request = ActionRequest::Extract {
            path: "/a.zip".into(),
            source_file: "/a.zip".into(),
            destination: "/a".into(),
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "mode": "extract",
                "path": "/a.zip",
                "sourceFile": "/a.zip",
                "destination": "/a"
            })
        );
    }

    #[test]
    fn test_interpret_nested_result_error() {
        let body = json!({"result": {"error": "exists"}});
        assert_eq!(interpret(body), Interpreted::Failure("exists".to_string()));
    }

    #[test]
    fn test_interpret_top_level_error() {
        let body = json!({"error": {"message": "forbidden"}});
        assert_eq!(
            interpret(body),
            Interpreted::Failure("forbidden".to_string())
        );
    }

    #[test]
    fn test_interpret_result_error_checked_first() {
        let body = json!({
            "result": {"error": "exists"},
            "error": {"message": "forbidden"}
        });
        assert_eq!(interpret(body), Interpreted::Failure("exists".to_string()));
    }

    #[test]
    fn test_interpret_nonstring_result_error() {
        // Truthy non-string errors still mean failure, never a commit.
        assert_eq!(
            interpret(json!({"result": {"error": true}})),
            Interpreted::Failure("true".to_string())
        );
        assert_eq!(
            interpret(json!({"result": {"error": 13}})),
            Interpreted::Failure("13".to_string())
        );
        assert_eq!(
            interpret(json!({"result": {"error": {"code": 13}}})),
            Interpreted::Failure(r#"{"code":13}"#.to_string())
        );
    }

    #[test]
    fn test_interpret_falsy_error_is_success() {
        for body in [
            json!({"result": {"error": ""}}),
            json!({"result": {"error": false}}),
            json!({"result": {"error": 0}}),
            json!({"result": {"error": null}}),
            json!({"error": {"message": ""}}),
        ] {
            assert!(matches!(interpret(body), Interpreted::Success(_)));
        }
    }

    #[test]
    fn test_interpret_success_keeps_body() {
        let body = json!({"result": "file contents"});
        assert_eq!(interpret(body.clone()), Interpreted::Success(body));
    }

    #[test]
    fn test_listing_record_defaults() {
        let record: ListingRecord = serde_json::from_value(json!({"name": "notes.txt"})).unwrap();
        assert_eq!(record.name, "notes.txt");
        assert_eq!(record.kind, EntryKind::File);
        assert_eq!(record.size, 0);
        assert!(record.rights.is_empty());
        assert!(record.web_path.is_empty());
    }

    #[test]
    fn test_listing_record_full() {
        let record: ListingRecord = serde_json::from_value(json!({
            "name": "docs",
            "type": "dir",
            "size": 4096,
            "date": "2024-01-15 10:30:00",
            "rights": "drwxr-xr-x",
            "webPath": "/files/docs"
        }))
        .unwrap();
        assert_eq!(record.kind, EntryKind::Dir);
        assert_eq!(record.size, 4096);
        assert_eq!(record.web_path, "/files/docs");
    }
}
