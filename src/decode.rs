//! Populating a record from posted form values.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::data::FormData;
use crate::field::{FieldDescriptor, ShowConditions};
use crate::validate::{MemoryValidationStore, StoreError, ValidationError, ValidationStore, Validator};
use crate::value::{FieldValue, FormRecord, NumberParseError, TypedValue};
use crate::walker::{RecordVisitor, Walker, element_name};

/// Failure modes of [`Decoder::decode`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
	/// One or more fields failed validation. The individual errors are in the
	/// validation store, and a snapshot of the record has been persisted for
	/// redisplay by the next encode.
	#[error("the posted values failed validation")]
	FailedValidation,
	/// A posted value could not be parsed into a numeric field.
	#[error(transparent)]
	Number(#[from] NumberParseError),
	/// A posted value could not be parsed into a date-time field.
	#[error("invalid date-time value: {0}")]
	Time(#[from] chrono::ParseError),
	/// A posted JSON blob could not be deserialized, or the failed record
	/// could not be snapshotted.
	#[error("invalid JSON value: {0}")]
	Json(#[from] serde_json::Error),
	/// The validation store failed; propagated verbatim.
	#[error(transparent)]
	Store(#[from] StoreError),
	/// A custom field decoder or a select/radio assignment failed.
	#[error("custom field decoder: {0}")]
	Custom(#[source] anyhow::Error),
}

/// Populates a [`FormRecord`] from posted form values.
///
/// Only keys the form would have rendered are consulted: traversal, paths and
/// show conditions are shared with the [`Encoder`](crate::Encoder), so a
/// hidden field can never be assigned through a forged post. Keys absent from
/// the posted data leave their fields unmodified.
///
/// # Examples
///
/// ```
/// use formkit::{Decoder, FieldMeta, FieldSlot, FieldValue, FormData, FormRecord};
/// use serde::Serialize;
///
/// #[derive(Default, Serialize)]
/// struct Profile {
/// 	age: u8,
/// }
///
/// impl FormRecord for Profile {
/// 	fn fields(&mut self) -> Vec<FieldSlot<'_>> {
/// 		vec![FieldSlot::new(
/// 			"Age",
/// 			FieldMeta::new(),
/// 			FieldValue::Number(&mut self.age),
/// 		)]
/// 	}
/// }
///
/// let form: FormData = [("Age", "25")].into_iter().collect();
/// let mut record = Profile::default();
/// Decoder::new(form).decode(&mut record).unwrap();
/// assert_eq!(record.age, 25);
/// ```
pub struct Decoder {
	form: FormData,
	validators: Vec<Box<dyn Validator>>,
	show_conditions: ShowConditions,
	validation_store: Box<dyn ValidationStore>,
	element_name_prefix: String,
	set_value_on_validation_error: bool,
}

impl Decoder {
	/// A decoder over one posted value set, with an in-memory validation store.
	pub fn new(form: FormData) -> Self {
		Self {
			form,
			validators: vec![],
			show_conditions: ShowConditions::new(),
			validation_store: Box::new(MemoryValidationStore::new()),
			element_name_prefix: String::new(),
			set_value_on_validation_error: false,
		}
	}

	/// Registers a validator, matched against field metadata by its tag name.
	pub fn add_validator(&mut self, validator: impl Validator + 'static) {
		self.validators.push(Box::new(validator));
	}

	/// Replaces the validation store errors and snapshots are written to.
	pub fn set_validation_store(&mut self, store: Box<dyn ValidationStore>) {
		self.validation_store = store;
	}

	/// Takes the current validation store, leaving a fresh in-memory one.
	/// Hand the taken store to the encoder to redisplay a failed form.
	pub fn take_validation_store(&mut self) -> Box<dyn ValidationStore> {
		std::mem::replace(&mut self.validation_store, Box::new(MemoryValidationStore::new()))
	}

	/// When set, values failing validation are still assigned to the record.
	/// By default they are discarded and the field keeps its prior value.
	pub fn set_value_on_validation_error(&mut self, set: bool) {
		self.set_value_on_validation_error = set;
	}

	/// Prefixes every expected element name with `prefix`; must match the
	/// prefix the form was encoded with.
	pub fn set_element_name_prefix(&mut self, prefix: impl Into<String>) {
		self.element_name_prefix = prefix.into();
	}

	/// Registers a named show condition. Must mirror the encoder's conditions,
	/// otherwise hidden fields could become assignable.
	pub fn add_show_condition(&mut self, name: impl Into<String>, condition: impl Fn() -> bool + 'static) {
		self.show_conditions.add_show_condition(name, condition);
	}

	/// Registers a condition consulted for every field.
	pub fn add_global_show_condition(
		&mut self,
		condition: impl Fn(&FieldDescriptor) -> bool + 'static,
	) {
		self.show_conditions.add_global_show_condition(condition);
	}

	/// Decodes the posted values into `record`.
	///
	/// All fields decode and all validators run before the result is known,
	/// so every problem is reported at once. When any validator fails, the
	/// errors are in the validation store, a snapshot of `record` is
	/// persisted for redisplay, and [`DecodeError::FailedValidation`] is
	/// returned.
	pub fn decode<R>(&mut self, record: &mut R) -> Result<(), DecodeError>
	where
		R: FormRecord + Serialize,
	{
		for validator in &mut self.validators {
			validator.bind_form(&self.form);
		}

		let mut visitor = DecodeVisitor {
			form: &self.form,
			validators: &self.validators,
			store: &mut *self.validation_store,
			prefix: &self.element_name_prefix,
			set_value_on_validation_error: self.set_value_on_validation_error,
			failures: 0,
		};

		Walker::new(&self.show_conditions).walk(record, &mut visitor)?;

		if visitor.failures > 0 {
			tracing::debug!(failures = visitor.failures, "decode failed validation");
			let snapshot = serde_json::to_value(&*record)?;
			self.validation_store.set_snapshot(snapshot)?;
			return Err(DecodeError::FailedValidation);
		}

		Ok(())
	}
}

struct DecodeVisitor<'a> {
	form: &'a FormData,
	validators: &'a [Box<dyn Validator>],
	store: &'a mut dyn ValidationStore,
	prefix: &'a str,
	set_value_on_validation_error: bool,
	failures: usize,
}

impl DecodeVisitor<'_> {
	/// Runs the field's declared validators against the parsed value,
	/// recording failures. Returns true if the value may be assigned.
	fn run_validators(
		&mut self,
		key: &str,
		desc: &FieldDescriptor,
		value: &TypedValue,
	) -> Result<bool, DecodeError> {
		let mut field_failures = 0;

		for tag in desc.validators() {
			let Some(validator) = self.validators.iter().find(|v| v.tag_name() == tag) else {
				continue;
			};

			if let Err(message) = validator.validate(value) {
				tracing::debug!(field = key, validator = %tag, error = %message, "validation failed");

				self.store.add_error(
					key,
					ValidationError {
						error: message,
						value: value.clone(),
					},
				)?;

				field_failures += 1;
			}
		}

		self.failures += field_failures;

		Ok(field_failures == 0 || self.set_value_on_validation_error)
	}
}

impl RecordVisitor for DecodeVisitor<'_> {
	type Error = DecodeError;

	fn enter_group(&mut self, _path: &str, _desc: &FieldDescriptor) -> Result<(), DecodeError> {
		Ok(())
	}

	fn leave_group(&mut self, _path: &str, _desc: &FieldDescriptor) -> Result<(), DecodeError> {
		Ok(())
	}

	fn field(
		&mut self,
		path: &str,
		desc: FieldDescriptor,
		value: FieldValue<'_>,
	) -> Result<(), DecodeError> {
		let key = element_name(self.prefix, path);
		let posted = self.form.get_all(&key);

		// custom decoders always run, even with nothing posted under the key
		let value = match value {
			FieldValue::Custom(custom) => {
				return custom
					.decode_form_value(self.form, &key, posted.unwrap_or_default())
					.map_err(DecodeError::Custom);
			}
			value => value,
		};

		// an absent key leaves the field unmodified
		let Some(posted) = posted else {
			return Ok(());
		};

		let raw = posted.first().map(String::as_str).unwrap_or_default();

		match value {
			FieldValue::Text(text) => {
				let typed = TypedValue::Text(raw.to_string());

				if self.run_validators(&key, &desc, &typed)? {
					text.set(raw.to_string());
				}
			}
			FieldValue::Number(number) => {
				let typed = number.parse(raw)?;

				if self.run_validators(&key, &desc, &typed)? {
					number.store(&typed);
				}
			}
			FieldValue::Boolean(boolean) => {
				let checked = raw == "on" || raw.parse::<i64>().is_ok_and(|v| v == 1);
				let typed = TypedValue::Boolean(checked);

				if self.run_validators(&key, &desc, &typed)? {
					boolean.set(checked);
				}
			}
			FieldValue::DateTime(time) => {
				// browsers post an empty string for a cleared picker
				if raw.is_empty() {
					return Ok(());
				}

				let parsed = NaiveDateTime::parse_from_str(raw, crate::TIME_FORMAT)?;
				let typed = TypedValue::DateTime(parsed);

				if self.run_validators(&key, &desc, &typed)? {
					*time = parsed;
				}
			}
			FieldValue::Select(select) => {
				let typed = TypedValue::Text(raw.to_string());

				if self.run_validators(&key, &desc, &typed)? {
					select.set_selected(posted).map_err(DecodeError::Custom)?;
				}
			}
			FieldValue::Radio(radio) => {
				let typed = TypedValue::Text(raw.to_string());

				if self.run_validators(&key, &desc, &typed)? {
					radio.set(raw).map_err(DecodeError::Custom)?;
				}
			}
			FieldValue::Json(json) => {
				let typed = TypedValue::Text(raw.to_string());

				if self.run_validators(&key, &desc, &typed)? {
					if raw.is_empty() {
						json.reset();
					} else {
						json.decode_json(raw)?;
					}
				}
			}
			FieldValue::Custom(_) => unreachable!("custom fields handled above"),
			// groups are handled by the walker, never as leaves
			FieldValue::Group(_) | FieldValue::Optional(_) => {
				unreachable!("group passed to decode")
			}
		}

		Ok(())
	}
}
