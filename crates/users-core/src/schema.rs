//! Schema validation for candidate user fields.
//!
//! Callers hand over the raw JSON body of a request and get back either the
//! normalised [`UserFields`] or a per-field list of error messages. Unknown
//! keys and read-only keys (`id`, `created_at`, `updated_at`) are ignored.
//!
//! | Field   | Rules |
//! |---------|-------|
//! | `name`  | string, trimmed, non-blank, at most [`NAME_MAX_LEN`] chars |
//! | `email` | string, trimmed, non-blank, valid address, at most [`EMAIL_MAX_LEN`] chars |

use std::{borrow::Cow, collections::BTreeMap, fmt};

use serde::Serialize;
use serde_json::{Map, Value};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::user::UserFields;

pub const NAME_MAX_LEN: usize = 150;
pub const EMAIL_MAX_LEN: usize = 254;

/// Key under which errors about the body as a whole are reported.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";
const NOT_BLANK: &str = "This field may not be blank.";
const NOT_STRING: &str = "Not a valid string.";
const NOT_BLANK_CODE: &str = "not_blank";

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Field name → messages. Serialises as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
  pub fn new() -> Self { Self::default() }

  pub fn add(&mut self, field: &str, message: impl Into<String>) {
    self.0.entry(field.to_owned()).or_default().push(message.into());
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn get(&self, field: &str) -> Option<&[String]> {
    self.0.get(field).map(Vec::as_slice)
  }

  pub fn fields(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }
}

impl fmt::Display for FieldErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, messages) in &self.0 {
      for message in messages {
        if !first {
          f.write_str("; ")?;
        }
        write!(f, "{field}: {message}")?;
        first = false;
      }
    }
    Ok(())
  }
}

// ─── Result ──────────────────────────────────────────────────────────────────

/// Outcome of validating a candidate body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
  Valid(UserFields),
  Invalid(FieldErrors),
}

impl Validation {
  pub fn into_result(self) -> Result<UserFields, FieldErrors> {
    match self {
      Validation::Valid(fields) => Ok(fields),
      Validation::Invalid(errors) => Err(errors),
    }
  }
}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Validate a complete set of fields, as for create or full update.
pub fn validate(candidate: &Value) -> Validation {
  match as_object(candidate) {
    Ok(obj) => validate_object(obj, None),
    Err(errors) => Validation::Invalid(errors),
  }
}

/// Validate `candidate` merged over `existing`, as for a partial update.
///
/// Absent keys keep their current value; every key that is present must pass
/// the same rules as on create.
pub fn validate_partial(existing: &UserFields, candidate: &Value) -> Validation {
  match as_object(candidate) {
    Ok(obj) => validate_object(obj, Some(existing)),
    Err(errors) => Validation::Invalid(errors),
  }
}

// ─── Internals ───────────────────────────────────────────────────────────────

/// Trimmed string values awaiting the declarative rules.
#[derive(Debug, Validate)]
struct Candidate {
  #[validate(
    custom(function = "not_blank"),
    length(max = 150, message = "Ensure this field has no more than 150 characters.")
  )]
  name:  String,
  #[validate(
    custom(function = "not_blank"),
    length(max = 254, message = "Ensure this field has no more than 254 characters."),
    email(message = "Enter a valid email address.")
  )]
  email: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
  if value.trim().is_empty() {
    return Err(
      ValidationError::new(NOT_BLANK_CODE).with_message(Cow::Borrowed(NOT_BLANK)),
    );
  }
  Ok(())
}

fn as_object(candidate: &Value) -> Result<&Map<String, Value>, FieldErrors> {
  candidate.as_object().ok_or_else(|| {
    let mut errors = FieldErrors::new();
    errors.add(
      NON_FIELD_ERRORS,
      format!(
        "Invalid data. Expected a dictionary, but got {}.",
        json_kind(candidate)
      ),
    );
    errors
  })
}

fn validate_object(
  obj:  &Map<String, Value>,
  base: Option<&UserFields>,
) -> Validation {
  let mut errors = FieldErrors::new();

  let name = string_field(obj, "name", base.map(|b| b.name.as_str()), &mut errors);
  let email = string_field(obj, "email", base.map(|b| b.email.as_str()), &mut errors);

  let candidate = Candidate {
    name:  name.unwrap_or_default(),
    email: email.unwrap_or_default(),
  };
  if let Err(rule_errors) = candidate.validate() {
    merge_rule_errors(&mut errors, &rule_errors);
  }

  if errors.is_empty() {
    Validation::Valid(UserFields {
      name:  candidate.name,
      email: candidate.email,
    })
  } else {
    Validation::Invalid(errors)
  }
}

/// Type-level pass over one key: presence, null and string-ness. Returns the
/// trimmed value when the key holds a string or falls back to `fallback`.
fn string_field(
  obj:      &Map<String, Value>,
  key:      &str,
  fallback: Option<&str>,
  errors:   &mut FieldErrors,
) -> Option<String> {
  match obj.get(key) {
    None => match fallback {
      Some(current) => Some(current.to_owned()),
      None => {
        errors.add(key, REQUIRED);
        None
      }
    },
    Some(Value::Null) => {
      errors.add(key, NOT_NULL);
      None
    }
    Some(Value::String(raw)) => Some(raw.trim().to_owned()),
    Some(_) => {
      errors.add(key, NOT_STRING);
      None
    }
  }
}

/// Copy `validator` failures into `errors`, skipping fields that already
/// failed the type-level pass. A blank value reports only the blank error.
fn merge_rule_errors(errors: &mut FieldErrors, rule_errors: &ValidationErrors) {
  let typed_failures: Vec<String> = errors.fields().map(str::to_owned).collect();

  for (field, field_errors) in rule_errors.field_errors() {
    let field = field.to_string();
    if typed_failures.contains(&field) {
      continue;
    }
    let blank = field_errors.iter().any(|e| e.code == NOT_BLANK_CODE);
    for error in field_errors.iter() {
      if blank && error.code != NOT_BLANK_CODE {
        continue;
      }
      let message = error
        .message
        .as_ref()
        .map_or_else(|| error.code.to_string(), |m| m.to_string());
      errors.add(&field, message);
    }
  }
}

fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "bool",
    Value::Number(_) => "number",
    Value::String(_) => "str",
    Value::Array(_) => "list",
    Value::Object(_) => "dict",
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  const BAD_EMAIL: &str = "Enter a valid email address.";

  fn alice() -> UserFields {
    UserFields {
      name:  "Alice".into(),
      email: "alice@example.com".into(),
    }
  }

  #[test]
  fn valid_body_is_trimmed() {
    let v = validate(&json!({ "name": "  Alice ", "email": " alice@example.com" }));
    assert_eq!(v, Validation::Valid(alice()));
  }

  #[test]
  fn unknown_and_read_only_keys_are_ignored() {
    let v = validate(&json!({
      "id": 99,
      "created_at": "yesterday",
      "name": "Alice",
      "email": "alice@example.com",
      "nickname": "al",
    }));
    assert_eq!(v, Validation::Valid(alice()));
  }

  #[test]
  fn missing_fields_are_required() {
    let errors = validate(&json!({})).into_result().unwrap_err();
    assert_eq!(errors.get("name").unwrap(), [REQUIRED]);
    assert_eq!(errors.get("email").unwrap(), [REQUIRED]);
  }

  #[test]
  fn each_field_reports_its_own_error() {
    let errors = validate(&json!({ "name": "", "email": "not-an-email" }))
      .into_result()
      .unwrap_err();
    assert_eq!(errors.get("name").unwrap(), [NOT_BLANK]);
    assert_eq!(errors.get("email").unwrap(), [BAD_EMAIL]);
  }

  #[test]
  fn null_and_wrong_types_are_rejected() {
    let errors = validate(&json!({ "name": null, "email": 42 }))
      .into_result()
      .unwrap_err();
    assert_eq!(errors.get("name").unwrap(), [NOT_NULL]);
    assert_eq!(errors.get("email").unwrap(), [NOT_STRING]);
  }

  #[test]
  fn overlong_name_is_rejected() {
    let long = "x".repeat(NAME_MAX_LEN + 1);
    let errors = validate(&json!({ "name": long, "email": "a@example.com" }))
      .into_result()
      .unwrap_err();
    assert_eq!(
      errors.get("name").unwrap(),
      ["Ensure this field has no more than 150 characters."]
    );
    assert!(errors.get("email").is_none());
  }

  #[test]
  fn length_limits_are_inclusive() {
    let name = "x".repeat(NAME_MAX_LEN);
    let v = validate(&json!({ "name": name, "email": "a@example.com" }));
    assert!(matches!(v, Validation::Valid(_)));

    let email = format!("{}@example.com", "a".repeat(EMAIL_MAX_LEN));
    let errors = validate(&json!({ "name": "Alice", "email": email }))
      .into_result()
      .unwrap_err();
    assert!(
      errors.get("email").unwrap()
        .contains(&"Ensure this field has no more than 254 characters.".to_owned())
    );
  }

  #[test]
  fn blank_value_reports_only_the_blank_rule() {
    let errors = validate(&json!({ "name": "   ", "email": "  " }))
      .into_result()
      .unwrap_err();
    assert_eq!(errors.get("name").unwrap(), [NOT_BLANK]);
    assert_eq!(errors.get("email").unwrap(), [NOT_BLANK]);
  }

  #[test]
  fn non_object_body_is_a_non_field_error() {
    let errors = validate(&json!(["Alice"])).into_result().unwrap_err();
    assert_eq!(
      errors.get(NON_FIELD_ERRORS).unwrap(),
      ["Invalid data. Expected a dictionary, but got list."]
    );
  }

  #[test]
  fn partial_keeps_absent_fields() {
    let v = validate_partial(&alice(), &json!({ "name": "Alicia" }));
    assert_eq!(
      v,
      Validation::Valid(UserFields {
        name:  "Alicia".into(),
        email: "alice@example.com".into(),
      })
    );
  }

  #[test]
  fn partial_still_validates_present_fields() {
    let errors = validate_partial(&alice(), &json!({ "email": "nope" }))
      .into_result()
      .unwrap_err();
    assert_eq!(errors.fields().collect::<Vec<_>>(), ["email"]);
  }

  #[test]
  fn display_joins_messages() {
    let mut errors = FieldErrors::new();
    errors.add("email", BAD_EMAIL);
    errors.add("name", REQUIRED);
    assert_eq!(
      errors.to_string(),
      "email: Enter a valid email address.; name: This field is required."
    );
  }
}
