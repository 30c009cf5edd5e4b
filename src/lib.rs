//! Bidirectional mapping between typed records and HTML forms.
//!
//! A record describes its fields once, via [`FormRecord`]; the [`Encoder`]
//! renders them as a form and the [`Decoder`] populates the record from the
//! posted values. Both directions share one traversal, so field paths, show
//! conditions and validation state always agree.
//!
//! - Field kinds are resolved from the value: text (with password/email/url/
//!   tel wrappers), numbers, checkboxes, `datetime-local` pickers, selects,
//!   radio groups, nested records as fieldsets, and a JSON textarea for
//!   anything opaque. [`CustomField`] overrides all of it.
//! - [`Validator`]s run on decode; failures land in a [`ValidationStore`]
//!   together with a snapshot of the user's input, and the next encode
//!   redisplays both.
//! - [`Decorator`]s hook every built element, typically to add CSS framework
//!   classes; [`decorators::Bootstrap4Decorator`] ships ready-made.
//!
//! # Examples
//!
//! ```
//! use formkit::{
//! 	Decoder, Encoder, FieldMeta, FieldSlot, FieldValue, FormData, FormRecord,
//! };
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize)]
//! struct Signup {
//! 	name: String,
//! 	age: u8,
//! }
//!
//! impl FormRecord for Signup {
//! 	fn fields(&mut self) -> Vec<FieldSlot<'_>> {
//! 		vec![
//! 			FieldSlot::new(
//! 				"Name",
//! 				FieldMeta::new().with_help("As it appears on your passport"),
//! 				FieldValue::Text(&mut self.name),
//! 			),
//! 			FieldSlot::new(
//! 				"Age",
//! 				FieldMeta::new().with_min("0").with_max("150"),
//! 				FieldValue::Number(&mut self.age),
//! 			),
//! 		]
//! 	}
//! }
//!
//! // render
//! let mut record = Signup::default();
//! let html = Encoder::new().encode(&mut record).unwrap();
//! assert!(html.contains(r#"name="Age""#));
//!
//! // and decode a submission
//! let form: FormData = [("Name", "John"), ("Age", "25")].into_iter().collect();
//! Decoder::new(form).decode(&mut record).unwrap();
//! assert_eq!(record.age, 25);
//! ```

pub mod data;
pub mod decode;
pub mod decorate;
pub mod decorators;
pub mod encode;
pub mod field;
pub mod node;
pub mod stores;
pub mod validate;
pub mod value;

pub(crate) mod walker;

/// The format `datetime-local` inputs post and display, yielding strings such
/// as `2022-02-08T11:32`.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub use data::FormData;
pub use decode::{DecodeError, Decoder};
pub use decorate::{Decorator, NullDecorator};
pub use encode::{EncodeError, Encoder, Raw};
pub use field::{FieldDescriptor, FieldMeta, ShowConditions};
pub use validate::{
	MemoryValidationStore, NotEmptyValidator, PatternValidator, RangeValidator, StoreError,
	ValidationError, ValidationStore, Validator,
};
pub use value::{
	BoolNumber, BooleanValue, CustomField, Email, FieldSlot, FieldValue, FormRecord, JsonValue,
	NumberParseError, NumberValue, OptionalGroup, Password, RadioValue, SelectOption, SelectValue,
	Tel, TextValue, TypedValue, Url,
};
pub use walker::FIELD_SEPARATOR;
