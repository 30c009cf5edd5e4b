//! Field validation and the store that carries errors across a round trip.
//!
//! Validators run during decode, after a value parses but before it is
//! assigned. Failures accumulate in a [`ValidationStore`] keyed by field
//! path; the following encode reads them back to annotate the form, then
//! clears them. A store may be in-memory (scoped to one decode/encode pair)
//! or persistent (scoped across a redirect, see [`crate::stores`]).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::FormData;
use crate::value::TypedValue;

/// A reusable validation rule, matched against field metadata by tag name.
///
/// All validators named on a field run in declaration order, and all of them
/// run even when an earlier one fails: the redisplayed form shows every
/// problem at once.
///
/// # Examples
///
/// ```
/// use formkit::{TypedValue, Validator};
///
/// struct CountryCode;
///
/// impl Validator for CountryCode {
/// 	fn tag_name(&self) -> &str {
/// 		"countryCode"
/// 	}
///
/// 	fn validate(&self, value: &TypedValue) -> Result<(), String> {
/// 		match value {
/// 			TypedValue::Text(v) if v.len() == 3 && *v == v.to_uppercase() => Ok(()),
/// 			_ => Err("Country codes must be 3 letters and uppercase".to_string()),
/// 		}
/// 	}
/// }
///
/// assert!(CountryCode.validate(&TypedValue::Text("GBR".into())).is_ok());
/// assert!(CountryCode.validate(&TypedValue::Text("uk".into())).is_err());
/// ```
pub trait Validator {
	/// The name matched against the `validators` metadata on a field.
	fn tag_name(&self) -> &str;

	/// Returns `Err(message)` when the value fails validation.
	fn validate(&self, value: &TypedValue) -> Result<(), String>;

	/// Called once with the full posted value set before the decode walk
	/// begins. Validators that need other fields' values override this.
	fn bind_form(&mut self, _form: &FormData) {}
}

/// An error recorded by a failing validator, keyed by field path in the
/// store. Serializable so persistent stores can keep it across requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
	/// The message returned by the validator.
	pub error: String,
	/// The value which failed validation.
	pub value: TypedValue,
}

/// Failures surfaced by a validation store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	#[error("validation store i/o: {0}")]
	Io(#[from] std::io::Error),
	#[error("validation store serialization: {0}")]
	Serialization(#[from] serde_json::Error),
}

/// Persistence contract for validation errors and the in-flight record.
///
/// The decoder writes errors and, on overall failure, a serialized snapshot
/// of the record. The following encode consumes the snapshot (exactly once)
/// to redisplay the user's input, reads the errors to annotate fields, and
/// finally clears the errors.
pub trait ValidationStore {
	/// Appends an error for the given field path.
	fn add_error(&mut self, field: &str, error: ValidationError) -> Result<(), StoreError>;

	/// All errors recorded for the given field path, in insertion order.
	fn errors(&self, field: &str) -> Result<Vec<ValidationError>, StoreError>;

	/// Removes every recorded error.
	fn clear_errors(&mut self) -> Result<(), StoreError>;

	/// Persists a serialized snapshot of the record being decoded.
	fn set_snapshot(&mut self, snapshot: serde_json::Value) -> Result<(), StoreError>;

	/// Takes the stored snapshot, if any, removing it from the store.
	fn take_snapshot(&mut self) -> Result<Option<serde_json::Value>, StoreError>;
}

/// In-memory [`ValidationStore`], scoped to one decode/encode pair.
///
/// This is the default store on both the encoder and decoder; errors never
/// outlive the instances sharing it.
#[derive(Debug, Default)]
pub struct MemoryValidationStore {
	errors: HashMap<String, Vec<ValidationError>>,
	snapshot: Option<serde_json::Value>,
}

impl MemoryValidationStore {
	pub fn new() -> Self {
		Self::default()
	}
}

impl ValidationStore for MemoryValidationStore {
	fn add_error(&mut self, field: &str, error: ValidationError) -> Result<(), StoreError> {
		self.errors.entry(field.to_string()).or_default().push(error);
		Ok(())
	}

	fn errors(&self, field: &str) -> Result<Vec<ValidationError>, StoreError> {
		Ok(self.errors.get(field).cloned().unwrap_or_default())
	}

	fn clear_errors(&mut self) -> Result<(), StoreError> {
		self.errors.clear();
		Ok(())
	}

	fn set_snapshot(&mut self, snapshot: serde_json::Value) -> Result<(), StoreError> {
		self.snapshot = Some(snapshot);
		Ok(())
	}

	fn take_snapshot(&mut self) -> Result<Option<serde_json::Value>, StoreError> {
		Ok(self.snapshot.take())
	}
}

/// Rejects empty and whitespace-only text.
#[derive(Debug, Clone)]
pub struct NotEmptyValidator {
	message: Option<String>,
}

impl NotEmptyValidator {
	pub fn new() -> Self {
		Self { message: None }
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}
}

impl Default for NotEmptyValidator {
	fn default() -> Self {
		Self::new()
	}
}

impl Validator for NotEmptyValidator {
	fn tag_name(&self) -> &str {
		"notempty"
	}

	fn validate(&self, value: &TypedValue) -> Result<(), String> {
		let empty = match value {
			TypedValue::Text(v) => v.trim().is_empty(),
			_ => false,
		};

		if empty {
			Err(self
				.message
				.clone()
				.unwrap_or_else(|| "This field must not be empty".to_string()))
		} else {
			Ok(())
		}
	}
}

/// Validates text against a regular expression.
///
/// Unlike the `pattern` metadata, which only emits the HTML attribute for the
/// browser, this enforces the pattern server-side.
///
/// # Examples
///
/// ```
/// use formkit::{PatternValidator, TypedValue, Validator};
///
/// let validator = PatternValidator::new("postcode", r"^[A-Z0-9 ]{5,8}$").unwrap();
/// assert!(validator.validate(&TypedValue::Text("F4K3 T0WN".into())).is_ok());
/// assert!(validator.validate(&TypedValue::Text("no".into())).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PatternValidator {
	tag_name: String,
	pattern: regex::Regex,
	message: Option<String>,
}

impl PatternValidator {
	/// Compiles the pattern; the tag name is what field metadata references.
	pub fn new(tag_name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
		Ok(Self {
			tag_name: tag_name.into(),
			pattern: regex::Regex::new(pattern)?,
			message: None,
		})
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}
}

impl Validator for PatternValidator {
	fn tag_name(&self) -> &str {
		&self.tag_name
	}

	fn validate(&self, value: &TypedValue) -> Result<(), String> {
		let text = value.to_string();

		if self.pattern.is_match(&text) {
			Ok(())
		} else {
			Err(self
				.message
				.clone()
				.unwrap_or_else(|| format!("Value must match {}", self.pattern.as_str())))
		}
	}
}

/// Enforces inclusive numeric bounds server-side.
#[derive(Debug, Clone)]
pub struct RangeValidator {
	tag_name: String,
	min: Option<f64>,
	max: Option<f64>,
}

impl RangeValidator {
	pub fn new(tag_name: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
		Self {
			tag_name: tag_name.into(),
			min,
			max,
		}
	}
}

impl Validator for RangeValidator {
	fn tag_name(&self) -> &str {
		&self.tag_name
	}

	fn validate(&self, value: &TypedValue) -> Result<(), String> {
		let v = match value {
			TypedValue::Integer(v) => *v as f64,
			TypedValue::Unsigned(v) => *v as f64,
			TypedValue::Float(v) => *v,
			_ => return Err("Value must be numeric".to_string()),
		};

		if let Some(min) = self.min
			&& v < min
		{
			return Err(format!("Value must be at least {min}"));
		}

		if let Some(max) = self.max
			&& v > max
		{
			return Err(format!("Value must be at most {max}"));
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_memory_store_accumulates_errors_in_order() {
		let mut store = MemoryValidationStore::new();

		store
			.add_error(
				"CountryCode",
				ValidationError {
					error: "first".to_string(),
					value: TypedValue::Text("uk".to_string()),
				},
			)
			.unwrap();
		store
			.add_error(
				"CountryCode",
				ValidationError {
					error: "second".to_string(),
					value: TypedValue::Text("uk".to_string()),
				},
			)
			.unwrap();

		let errors = store.errors("CountryCode").unwrap();
		assert_eq!(errors.len(), 2);
		assert_eq!(errors[0].error, "first");
		assert_eq!(errors[1].error, "second");

		assert!(store.errors("Age").unwrap().is_empty());

		store.clear_errors().unwrap();
		assert!(store.errors("CountryCode").unwrap().is_empty());
	}

	#[rstest]
	fn test_memory_store_snapshot_consumed_once() {
		let mut store = MemoryValidationStore::new();
		store.set_snapshot(serde_json::json!({"Age": 25})).unwrap();

		let first = store.take_snapshot().unwrap();
		assert_eq!(first, Some(serde_json::json!({"Age": 25})));

		let second = store.take_snapshot().unwrap();
		assert_eq!(second, None);
	}

	#[rstest]
	#[case(TypedValue::Text("".to_string()), false)]
	#[case(TypedValue::Text("   ".to_string()), false)]
	#[case(TypedValue::Text("x".to_string()), true)]
	#[case(TypedValue::Integer(0), true)]
	fn test_not_empty_validator(#[case] value: TypedValue, #[case] ok: bool) {
		assert_eq!(NotEmptyValidator::new().validate(&value).is_ok(), ok);
	}

	#[rstest]
	fn test_pattern_validator_message() {
		let validator = PatternValidator::new("threeUpper", "^[A-Z]{3}$")
			.unwrap()
			.with_message("Country codes must be 3 letters and uppercase");

		let err = validator
			.validate(&TypedValue::Text("uk".to_string()))
			.unwrap_err();
		assert_eq!(err, "Country codes must be 3 letters and uppercase");
	}

	#[rstest]
	#[case(TypedValue::Integer(20), true)]
	#[case(TypedValue::Integer(19), false)]
	#[case(TypedValue::Float(150.0), true)]
	#[case(TypedValue::Float(150.5), false)]
	fn test_range_validator(#[case] value: TypedValue, #[case] ok: bool) {
		let validator = RangeValidator::new("age", Some(20.0), Some(150.0));
		assert_eq!(validator.validate(&value).is_ok(), ok);
	}
}
