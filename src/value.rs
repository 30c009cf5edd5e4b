//! The structured value model records expose to the walker.
//!
//! Rust has no runtime reflection, so a record describes its own shape: the
//! [`FormRecord`] trait yields an ordered list of [`FieldSlot`]s, each pairing
//! a field name and its [`FieldMeta`](crate::FieldMeta) with a [`FieldValue`]
//! borrow of the underlying data. `FieldValue` is a closed tagged union; its
//! variants are the semantic field kinds, and their order in the encoder and
//! decoder match statements is the documented kind-resolution precedence:
//!
//! 1. [`CustomField`] — user-supplied build/parse, overriding everything
//! 2. fixed built-in kinds: date-time, select, radio list
//! 3. primitive kinds: text, number, boolean
//! 4. opaque collections serialized as a JSON text area
//!
//! Nested records appear as `Group` (or `Optional` for lazily-allocated
//! sub-records) and are recursed into rather than built as leaves.

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::FieldDescriptor;
use crate::FieldMeta;
use crate::data::FormData;
use crate::decorate::Decorator;
use crate::node::Element;

/// A record that can be rendered as a form and populated from posted values.
///
/// Implementations list every field in declaration order. Unlisted fields are
/// invisible to both directions, the equivalent of an unexported field.
pub trait FormRecord {
	fn fields(&mut self) -> Vec<FieldSlot<'_>>;
}

impl<T: FormRecord + ?Sized> FormRecord for Box<T> {
	fn fields(&mut self) -> Vec<FieldSlot<'_>> {
		(**self).fields()
	}
}

/// One field of a record: its declared name, its metadata, and a mutable
/// borrow of its value.
pub struct FieldSlot<'a> {
	pub name: &'static str,
	pub meta: FieldMeta,
	pub value: FieldValue<'a>,
}

impl<'a> FieldSlot<'a> {
	pub fn new(name: &'static str, meta: FieldMeta, value: FieldValue<'a>) -> Self {
		Self { name, meta, value }
	}
}

/// A mutable borrow of one field's data, tagged with its semantic kind.
pub enum FieldValue<'a> {
	/// User-supplied rendering and parsing, overriding built-in resolution.
	Custom(&'a mut dyn CustomField),
	/// Rendered as an `<input type="datetime-local">`.
	DateTime(&'a mut NaiveDateTime),
	/// Rendered as a `<select>` from the value's option list.
	Select(&'a mut dyn SelectValue),
	/// Rendered as one labeled radio input per option.
	Radio(&'a mut dyn RadioValue),
	/// Plain text input, or a textarea when the metadata says so.
	Text(&'a mut dyn TextValue),
	/// Numeric input with optional min/max/step.
	Number(&'a mut dyn NumberValue),
	/// Checkbox.
	Boolean(&'a mut dyn BooleanValue),
	/// Opaque collection round-tripped through a pretty-printed JSON textarea.
	Json(&'a mut dyn JsonValue),
	/// A nested record, recursed into as a fieldset.
	Group(&'a mut dyn FormRecord),
	/// An optional nested record, allocated before descent so optional
	/// sub-structures always render and decode.
	Optional(&'a mut dyn OptionalGroup),
}

/// The typed value handed to validators after parsing, before assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypedValue {
	Text(String),
	Integer(i64),
	Unsigned(u64),
	Float(f64),
	Boolean(bool),
	DateTime(NaiveDateTime),
}

impl std::fmt::Display for TypedValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			TypedValue::Text(v) => write!(f, "{v}"),
			TypedValue::Integer(v) => write!(f, "{v}"),
			TypedValue::Unsigned(v) => write!(f, "{v}"),
			TypedValue::Float(v) => write!(f, "{v}"),
			TypedValue::Boolean(v) => write!(f, "{v}"),
			TypedValue::DateTime(v) => write!(f, "{}", v.format(crate::TIME_FORMAT)),
		}
	}
}

/// A string-backed field. Implemented by `String` and by the wrapper types
/// that select a more specific input type.
pub trait TextValue {
	fn get(&self) -> &str;
	fn set(&mut self, value: String);

	/// The HTML input `type` this value renders as, absent a metadata
	/// override.
	fn input_type(&self) -> &'static str {
		"text"
	}
}

impl TextValue for String {
	fn get(&self) -> &str {
		self
	}

	fn set(&mut self, value: String) {
		*self = value;
	}
}

macro_rules! text_wrapper {
	($(#[$doc:meta])* $name:ident, $input_type:literal) => {
		$(#[$doc])*
		#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
		pub struct $name(pub String);

		impl $name {
			pub fn new(value: impl Into<String>) -> Self {
				Self(value.into())
			}

			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl From<&str> for $name {
			fn from(value: &str) -> Self {
				Self(value.to_string())
			}
		}

		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl TextValue for $name {
			fn get(&self) -> &str {
				&self.0
			}

			fn set(&mut self, value: String) {
				self.0 = value;
			}

			fn input_type(&self) -> &'static str {
				$input_type
			}
		}
	};
}

text_wrapper!(
	/// A string rendered as an `<input type="password">`.
	Password,
	"password"
);
text_wrapper!(
	/// A string rendered as an `<input type="email">`.
	Email,
	"email"
);
text_wrapper!(
	/// A string rendered as an `<input type="url">`.
	Url,
	"url"
);
text_wrapper!(
	/// A string rendered as an `<input type="tel">`.
	Tel,
	"tel"
);

/// Error parsing a posted value into a numeric field.
#[derive(Debug, thiserror::Error)]
pub enum NumberParseError {
	#[error("invalid integer: {0}")]
	Int(#[from] std::num::ParseIntError),
	#[error("invalid number: {0}")]
	Float(#[from] std::num::ParseFloatError),
}

/// A numeric field. Implemented for the primitive integer and float types.
///
/// Parsing and assignment are separate steps: the decoder parses first, runs
/// the field's validators against the typed value, and only then decides
/// whether to store it.
pub trait NumberValue {
	/// The value as it appears in the input's `value` attribute.
	fn display(&self) -> String;

	/// Floats default their `step` attribute to `any` when unspecified.
	fn is_float(&self) -> bool {
		false
	}

	/// Base-10 parse of a posted value into this field's type.
	fn parse(&self, raw: &str) -> Result<TypedValue, NumberParseError>;

	/// Stores a previously parsed value. Values produced by `parse` on the
	/// same field always store cleanly; mismatched variants are ignored.
	fn store(&mut self, value: &TypedValue);
}

macro_rules! signed_number {
	($($t:ty),*) => {$(
		impl NumberValue for $t {
			fn display(&self) -> String {
				self.to_string()
			}

			fn parse(&self, raw: &str) -> Result<TypedValue, NumberParseError> {
				Ok(TypedValue::Integer(raw.parse::<$t>()? as i64))
			}

			fn store(&mut self, value: &TypedValue) {
				if let TypedValue::Integer(v) = value {
					*self = *v as $t;
				}
			}
		}
	)*};
}

macro_rules! unsigned_number {
	($($t:ty),*) => {$(
		impl NumberValue for $t {
			fn display(&self) -> String {
				self.to_string()
			}

			fn parse(&self, raw: &str) -> Result<TypedValue, NumberParseError> {
				Ok(TypedValue::Unsigned(raw.parse::<$t>()? as u64))
			}

			fn store(&mut self, value: &TypedValue) {
				if let TypedValue::Unsigned(v) = value {
					*self = *v as $t;
				}
			}
		}
	)*};
}

macro_rules! float_number {
	($($t:ty),*) => {$(
		impl NumberValue for $t {
			fn display(&self) -> String {
				self.to_string()
			}

			fn is_float(&self) -> bool {
				true
			}

			fn parse(&self, raw: &str) -> Result<TypedValue, NumberParseError> {
				Ok(TypedValue::Float(raw.parse::<$t>()? as f64))
			}

			fn store(&mut self, value: &TypedValue) {
				if let TypedValue::Float(v) = value {
					*self = *v as $t;
				}
			}
		}
	)*};
}

signed_number!(i8, i16, i32, i64, isize);
unsigned_number!(u8, u16, u32, u64, usize);
float_number!(f32, f64);

/// A boolean-backed field rendered as a checkbox.
pub trait BooleanValue {
	fn get(&self) -> bool;
	fn set(&mut self, value: bool);
}

impl BooleanValue for bool {
	fn get(&self) -> bool {
		*self
	}

	fn set(&mut self, value: bool) {
		*self = value;
	}
}

/// An integer-backed boolean, for schemas which store flags as 0/1.
///
/// # Examples
///
/// ```
/// use formkit::BoolNumber;
///
/// let mut flag = BoolNumber::default();
/// assert!(!flag.as_bool());
/// flag.set_bool(true);
/// assert_eq!(flag, BoolNumber(1));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoolNumber(pub i64);

impl BoolNumber {
	pub fn as_bool(&self) -> bool {
		self.0 == 1
	}

	pub fn set_bool(&mut self, value: bool) {
		self.0 = if value { 1 } else { 0 };
	}
}

impl BooleanValue for BoolNumber {
	fn get(&self) -> bool {
		self.as_bool()
	}

	fn set(&mut self, value: bool) {
		self.set_bool(value);
	}
}

/// One selectable value for select and radio kinds.
///
/// # Examples
///
/// ```
/// use formkit::SelectOption;
///
/// let opt = SelectOption::new("cat", "Cat").disabled();
/// assert!(opt.disabled);
/// assert_eq!(opt.value, "cat");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectOption {
	pub value: String,
	pub label: String,
	pub disabled: bool,
	/// Explicit checked/selected override. When absent, the checked state is
	/// resolved by equality (or membership, for multi-selects) against the
	/// current field value.
	pub checked: Option<bool>,
	/// Options sharing a group label render inside one `<optgroup>`.
	pub group: Option<String>,
	/// Passthrough attributes copied onto the option element.
	pub attrs: Vec<(String, String)>,
}

impl SelectOption {
	pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			label: label.into(),
			..Self::default()
		}
	}

	pub fn disabled(mut self) -> Self {
		self.disabled = true;
		self
	}

	pub fn with_checked(mut self, checked: bool) -> Self {
		self.checked = Some(checked);
		self
	}

	pub fn with_group(mut self, group: impl Into<String>) -> Self {
		self.group = Some(group.into());
		self
	}

	pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attrs.push((name.into(), value.into()));
		self
	}
}

/// A field rendered as a `<select>` dropdown.
pub trait SelectValue {
	/// Whether multiple options may be selected at once.
	fn multiple(&self) -> bool {
		false
	}

	/// The available options.
	fn options(&self) -> Vec<SelectOption>;

	/// The currently selected value(s), compared against option values to
	/// resolve selected state on encode.
	fn selected(&self) -> Vec<String>;

	/// Assigns the posted selection. Errors propagate as hard decode errors.
	fn set_selected(&mut self, values: &[String]) -> anyhow::Result<()>;
}

/// A field rendered as a group of radio buttons.
pub trait RadioValue {
	/// The available options.
	fn options(&self) -> Vec<SelectOption>;

	/// The currently checked value.
	fn current(&self) -> String;

	/// Assigns the posted value. Errors propagate as hard decode errors.
	fn set(&mut self, value: &str) -> anyhow::Result<()>;
}

/// Opaque collection round-tripped through JSON text.
///
/// Blanket-implemented for every `Serialize + DeserializeOwned + Default`
/// type, so slices, maps and other unrecognized shapes can be listed as
/// [`FieldValue::Json`] without further ceremony.
pub trait JsonValue {
	fn encode_json(&self) -> Result<String, serde_json::Error>;
	fn decode_json(&mut self, raw: &str) -> Result<(), serde_json::Error>;

	/// Resets to the type's default; used when an empty string is posted.
	fn reset(&mut self);
}

impl<T> JsonValue for T
where
	T: Serialize + DeserializeOwned + Default,
{
	fn encode_json(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string_pretty(self)
	}

	fn decode_json(&mut self, raw: &str) -> Result<(), serde_json::Error> {
		*self = serde_json::from_str(raw)?;
		Ok(())
	}

	fn reset(&mut self) {
		*self = T::default();
	}
}

/// User-supplied element building and value parsing for one field type,
/// fully overriding the built-in kind resolution.
pub trait CustomField {
	/// Builds the field's element(s) into `parent`. The element name to use
	/// is `key`; the decorator should be applied to whatever is built.
	fn build_form_element(
		&self,
		key: &str,
		parent: &mut Element,
		field: &FieldDescriptor,
		decorator: &dyn Decorator,
	) -> anyhow::Result<()>;

	/// Parses this field's posted values. `values` holds the values posted
	/// under `key` (possibly none); `form` carries the full posted set for
	/// decoders that need other keys.
	fn decode_form_value(
		&mut self,
		form: &FormData,
		key: &str,
		values: &[String],
	) -> anyhow::Result<()>;
}

/// An optional nested record, allocated on first visit.
///
/// Implemented for `Option<T>` where the record type has a default, mirroring
/// lazy allocation of nil pointers: an absent sub-record still renders its
/// fields and still receives decoded values.
pub trait OptionalGroup {
	fn get_or_insert_record(&mut self) -> &mut dyn FormRecord;
}

impl<T: FormRecord + Default> OptionalGroup for Option<T> {
	fn get_or_insert_record(&mut self) -> &mut dyn FormRecord {
		self.get_or_insert_with(T::default)
	}
}
