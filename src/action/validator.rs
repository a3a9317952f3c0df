//! Turns an untrusted candidate into an `Action`, or rejects it

use serde_json::Value;
use url::Url;

use crate::action::schema::{expected_shape, Action, ActionKind, ValueShape};
use crate::core::{DispatchError, RawCandidate};

/// Validate a raw candidate against the action schema.
///
/// Pure and deterministic. Extra top-level keys are ignored.
pub fn validate(candidate: &RawCandidate) -> Result<Action, DispatchError> {
    let kind = match candidate.get("action") {
        Some(Value::String(name)) => ActionKind::parse(name)
            .ok_or_else(|| DispatchError::UnknownAction(Some(name.trim().to_string())))?,
        Some(other) => return Err(DispatchError::UnknownAction(Some(other.to_string()))),
        None => return Err(DispatchError::UnknownAction(None)),
    };

    let value = candidate.get("value").unwrap_or(&Value::Null);

    match expected_shape(kind) {
        ValueShape::Url => Ok(Action::Navigate {
            url: url_value(value)?,
        }),
        ValueShape::Selector => Ok(Action::Click {
            selector: non_empty_str(value, "value")?,
        }),
        ValueShape::FormFill => {
            let Value::Object(fields) = value else {
                return Err(DispatchError::malformed(
                    "value",
                    "expected an object with 'selector' and 'text'",
                ));
            };
            let selector = non_empty_str(fields.get("selector").unwrap_or(&Value::Null), "value.selector")?;
            let text = match fields.get("text") {
                Some(Value::String(text)) => text.clone(),
                _ => return Err(DispatchError::malformed("value.text", "must be a string")),
            };
            Ok(Action::FillForm { selector, text })
        }
        ValueShape::Absent => {
            if !value.is_null() {
                tracing::debug!(%value, "ignoring value sent with GET_CONTENT");
            }
            Ok(Action::GetContent)
        }
        ValueShape::Text => match value {
            Value::String(text) => Ok(Action::Say { text: text.clone() }),
            _ => Err(DispatchError::malformed("value", "must be a string")),
        },
    }
}

fn non_empty_str(value: &Value, field: &str) -> Result<String, DispatchError> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(DispatchError::malformed(field, "must be a non-empty string")),
    }
}

/// Shape check only; reachability and scheme policy belong to the browser.
fn url_value(value: &Value) -> Result<String, DispatchError> {
    let raw = non_empty_str(value, "value")?;
    match Url::parse(&raw) {
        Ok(_) => Ok(raw),
        Err(e) => Err(DispatchError::malformed(
            "value",
            format!("'{}' is not an absolute URL ({})", raw, e),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_of(err: DispatchError) -> String {
        match err {
            DispatchError::MalformedValue { field, .. } => field,
            other => panic!("expected MalformedValue, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_each_kind() {
        assert_eq!(
            validate(&json!({"action": "NAVIGATE", "value": "https://example.com"})).unwrap(),
            Action::Navigate {
                url: "https://example.com".into()
            }
        );
        assert_eq!(
            validate(&json!({"action": "CLICK", "value": "button#submit"})).unwrap(),
            Action::Click {
                selector: "button#submit".into()
            }
        );
        assert_eq!(
            validate(&json!({"action": "FILL_FORM", "value": {"selector": "input#user", "text": "me"}}))
                .unwrap(),
            Action::FillForm {
                selector: "input#user".into(),
                text: "me".into()
            }
        );
        assert_eq!(
            validate(&json!({"action": "GET_CONTENT", "value": null})).unwrap(),
            Action::GetContent
        );
        assert_eq!(
            validate(&json!({"action": "SAY", "value": "Olá"})).unwrap(),
            Action::Say { text: "Olá".into() }
        );
    }

    #[test]
    fn test_unknown_or_missing_kind() {
        assert_eq!(
            validate(&json!({"action": "SCROLL", "value": 1})),
            Err(DispatchError::UnknownAction(Some("SCROLL".into())))
        );
        assert_eq!(
            validate(&json!({"value": "x"})),
            Err(DispatchError::UnknownAction(None))
        );
        assert_eq!(validate(&json!("NAVIGATE")), Err(DispatchError::UnknownAction(None)));
        assert!(matches!(
            validate(&json!({"action": 3})),
            Err(DispatchError::UnknownAction(Some(_)))
        ));
    }

    #[test]
    fn test_empty_url_rejected() {
        let err = validate(&json!({"action": "NAVIGATE", "value": ""})).unwrap_err();
        assert_eq!(field_of(err), "value");
    }

    #[test]
    fn test_relative_url_rejected() {
        let err = validate(&json!({"action": "NAVIGATE", "value": "example.com"})).unwrap_err();
        assert_eq!(field_of(err), "value");
    }

    #[test]
    fn test_get_content_tolerates_value() {
        assert_eq!(
            validate(&json!({"action": "GET_CONTENT", "value": "ignored"})).unwrap(),
            Action::GetContent
        );
        assert_eq!(
            validate(&json!({"action": "GET_CONTENT"})).unwrap(),
            Action::GetContent
        );
    }

    #[test]
    fn test_fill_form_fields() {
        let missing_text =
            validate(&json!({"action": "FILL_FORM", "value": {"selector": "#a"}})).unwrap_err();
        assert_eq!(field_of(missing_text), "value.text");

        let numeric_selector =
            validate(&json!({"action": "FILL_FORM", "value": {"selector": 4, "text": "x"}}))
                .unwrap_err();
        assert_eq!(field_of(numeric_selector), "value.selector");

        let not_object =
            validate(&json!({"action": "FILL_FORM", "value": "#a"})).unwrap_err();
        assert_eq!(field_of(not_object), "value");

        // empty text clears a field
        assert!(validate(&json!({"action": "FILL_FORM", "value": {"selector": "#a", "text": ""}}))
            .is_ok());
    }

    #[test]
    fn test_click_and_say_types() {
        assert!(validate(&json!({"action": "CLICK", "value": null})).is_err());
        assert!(validate(&json!({"action": "CLICK", "value": "  "})).is_err());
        assert!(validate(&json!({"action": "SAY", "value": 42})).is_err());
        assert!(validate(&json!({"action": "SAY", "value": ""})).is_ok());
    }

    #[test]
    fn test_kind_is_normalized() {
        assert_eq!(
            validate(&json!({"action": " navigate ", "value": "https://a.b", "reply": "extra"}))
                .unwrap()
                .kind(),
            ActionKind::Navigate
        );
    }

    #[test]
    fn test_wire_form_validates_back() {
        let actions = [
            Action::Navigate {
                url: "https://example.com/".into(),
            },
            Action::Click {
                selector: "a".into(),
            },
            Action::FillForm {
                selector: "#q".into(),
                text: "rust".into(),
            },
            Action::GetContent,
            Action::Say { text: "hi".into() },
        ];
        for action in actions {
            assert_eq!(validate(&action.to_wire()).unwrap(), action);
        }
    }
}
