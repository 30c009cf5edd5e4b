//! Per-field metadata and the descriptor handed to builders and decorators.
//!
//! [`FieldMeta`] is the explicit per-field configuration record a
//! [`FormRecord`](crate::FormRecord) attaches to each of its slots. The
//! rendering and decoding behavior of a field is controlled entirely by this
//! metadata:
//!
//! - `name` — overrides the label text. An empty override suppresses the label.
//! - `help` — prompt text displayed alongside the input.
//! - `show` — visibility directives: condition names registered via
//!   [`ShowConditions::add_show_condition`], `-` for always hidden,
//!   `contents` to suppress the surrounding fieldset, `fieldset` to force one
//!   for an embedded record.
//! - `input_type` — HTML `type` attribute override, including `hidden`.
//! - `element` — `textarea` renders a string field as a `<textarea>`.
//! - `min` / `max` / `step` — numeric bounds, or min/max length for strings.
//! - `pattern` — regex `pattern` attribute for text inputs.
//! - `required` / `placeholder` — the corresponding input attributes.
//! - `validators` — tag names of [`Validator`](crate::Validator)s to run on
//!   decode.

use std::collections::HashMap;

use crate::validate::ValidationError;

/// Declarative metadata for one record field.
///
/// # Examples
///
/// ```
/// use formkit::FieldMeta;
///
/// let meta = FieldMeta::new()
/// 	.with_name("Phone Number")
/// 	.with_help("Include the area code")
/// 	.with_pattern("[0-9]+")
/// 	.required();
/// assert_eq!(meta.name.as_deref(), Some("Phone Number"));
/// assert!(meta.required);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldMeta {
	pub name: Option<String>,
	pub help: Option<String>,
	pub show: Vec<String>,
	pub input_type: Option<String>,
	pub element: Option<String>,
	pub min: Option<String>,
	pub max: Option<String>,
	pub step: Option<String>,
	pub pattern: Option<String>,
	pub required: bool,
	pub placeholder: Option<String>,
	pub validators: Vec<String>,
	/// Embedded records are promoted into the parent fieldset unless the
	/// `fieldset` show directive forces their own.
	pub anonymous: bool,
}

impl FieldMeta {
	pub fn new() -> Self {
		Self::default()
	}

	/// Overrides the display name used in the label.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Sets the help text displayed alongside the input.
	pub fn with_help(mut self, help: impl Into<String>) -> Self {
		self.help = Some(help.into());
		self
	}

	/// Adds a show directive: a condition name, `-`, `contents` or `fieldset`.
	pub fn with_show(mut self, directive: impl Into<String>) -> Self {
		self.show.push(directive.into());
		self
	}

	/// Overrides the HTML input `type` attribute.
	pub fn with_input_type(mut self, input_type: impl Into<String>) -> Self {
		self.input_type = Some(input_type.into());
		self
	}

	/// Selects the element used for string fields; `textarea` is the only
	/// recognized value.
	pub fn with_element(mut self, element: impl Into<String>) -> Self {
		self.element = Some(element.into());
		self
	}

	pub fn with_min(mut self, min: impl Into<String>) -> Self {
		self.min = Some(min.into());
		self
	}

	pub fn with_max(mut self, max: impl Into<String>) -> Self {
		self.max = Some(max.into());
		self
	}

	pub fn with_step(mut self, step: impl Into<String>) -> Self {
		self.step = Some(step.into());
		self
	}

	pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
		self.pattern = Some(pattern.into());
		self
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
		self.placeholder = Some(placeholder.into());
		self
	}

	/// Names a registered validator to run against this field on decode.
	pub fn with_validator(mut self, tag_name: impl Into<String>) -> Self {
		self.validators.push(tag_name.into());
		self
	}

	/// Marks the field as embedded, promoting its children into the parent
	/// fieldset.
	pub fn anonymous(mut self) -> Self {
		self.anonymous = true;
		self
	}
}

/// A read-only view over one visited field: its structural name, its
/// [`FieldMeta`], and any validation errors attached during encode.
///
/// Descriptors are constructed fresh for every field visited during a walk
/// and never mutated afterwards, except that the encoder attaches the
/// validation errors recorded by a preceding decode so decorators and the
/// inline validation text can see them.
#[derive(Debug, Clone, Default)]
pub struct FieldDescriptor {
	/// Declared field name within the record, e.g. `AddressLine1`.
	pub field_name: String,
	pub meta: FieldMeta,
	/// Errors recorded for this field by a preceding decode. Only set on encode.
	pub validation_errors: Vec<ValidationError>,
}

impl FieldDescriptor {
	pub fn new(field_name: impl Into<String>, meta: FieldMeta) -> Self {
		Self {
			field_name: field_name.into(),
			meta,
			validation_errors: vec![],
		}
	}

	/// Descriptor for the record root, which has no metadata of its own.
	pub(crate) fn root() -> Self {
		Self::default()
	}

	/// The label text: the metadata name override if present, otherwise the
	/// field name split at camel-case boundaries (`HouseNumber` → `House
	/// Number`). An override of `-` yields an empty name.
	pub fn display_name(&self) -> String {
		match self.meta.name.as_deref() {
			Some("-") => String::new(),
			Some(name) => name.to_string(),
			None => split_camel_case(&self.field_name),
		}
	}

	pub fn help_text(&self) -> &str {
		self.meta.help.as_deref().unwrap_or_default()
	}

	/// Resolves visibility against the registered show conditions.
	///
	/// Global conditions are consulted first: any returning false hides the
	/// field. Then the first show directive naming a registered condition
	/// wins. The `-` directive hides the field unconditionally.
	pub fn hidden(&self, conditions: &ShowConditions) -> bool {
		if !conditions.globals_allow(self) {
			return true;
		}

		for directive in &self.meta.show {
			if let Some(condition) = conditions.named.get(directive.as_str()) {
				return !condition();
			}
		}

		self.meta.show.iter().any(|d| d == "-")
	}

	/// The HTML input `type`, falling back to the builder's default.
	pub fn input_type<'a>(&'a self, default: &'a str) -> &'a str {
		self.meta.input_type.as_deref().unwrap_or(default)
	}

	/// True if the field renders as a bare `<input type="hidden">` with no
	/// label, help or validation furniture.
	pub fn hidden_input(&self) -> bool {
		self.input_type("") == "hidden"
	}

	pub fn element(&self) -> &str {
		self.meta.element.as_deref().unwrap_or_default()
	}

	pub fn min(&self) -> Option<&str> {
		self.meta.min.as_deref()
	}

	pub fn max(&self) -> Option<&str> {
		self.meta.max.as_deref()
	}

	pub fn step(&self) -> Option<&str> {
		self.meta.step.as_deref()
	}

	pub fn pattern(&self) -> Option<&str> {
		self.meta.pattern.as_deref()
	}

	pub fn placeholder(&self) -> Option<&str> {
		self.meta.placeholder.as_deref()
	}

	pub fn required(&self) -> bool {
		self.meta.required
	}

	/// Whether a visited group builds its own fieldset. The `contents`
	/// directive suppresses it, `fieldset` forces one for embedded records,
	/// otherwise embedded records are promoted and named records get one.
	pub fn build_fieldset(&self) -> bool {
		for directive in &self.meta.show {
			match directive.as_str() {
				"contents" => return false,
				"fieldset" => return true,
				_ => {}
			}
		}

		!self.meta.anonymous
	}

	/// Tag names of the validators to run against this field.
	pub fn validators(&self) -> &[String] {
		&self.meta.validators
	}
}

/// Splits a camel-case identifier into space-separated words.
///
/// Runs of upper-case letters stay together (`HTTPStatus` → `HTTP Status`),
/// digits form their own word (`AddressLine1` → `Address Line 1`).
pub(crate) fn split_camel_case(name: &str) -> String {
	let chars: Vec<char> = name.chars().collect();
	let mut words: Vec<String> = vec![];
	let mut current = String::new();

	for (i, &c) in chars.iter().enumerate() {
		let prev = i.checked_sub(1).map(|p| chars[p]);
		let next = chars.get(i + 1).copied();

		let boundary = match prev {
			None => false,
			Some(p) => {
				(c.is_uppercase() && !p.is_uppercase())
					|| (c.is_uppercase() && next.is_some_and(|n| n.is_lowercase()))
					|| (c.is_ascii_digit() != p.is_ascii_digit())
			}
		};

		if boundary && !current.is_empty() {
			words.push(std::mem::take(&mut current));
		}

		current.push(c);
	}

	if !current.is_empty() {
		words.push(current);
	}

	words.join(" ")
}

/// A named predicate controlling field visibility.
pub type ShowConditionFn = Box<dyn Fn() -> bool>;

/// A predicate consulted for every field, receiving its descriptor.
pub type GlobalShowConditionFn = Box<dyn Fn(&FieldDescriptor) -> bool>;

/// Registry of visibility predicates, resolved by the show directives on each
/// field's metadata.
///
/// The same conditions should be registered on both the encoder and the
/// decoder: a field hidden on encode must also be unassignable on decode,
/// otherwise posted values could mutate fields the form never exposed.
///
/// # Examples
///
/// ```
/// use formkit::{FieldDescriptor, FieldMeta, ShowConditions};
///
/// let mut conditions = ShowConditions::new();
/// conditions.add_show_condition("adminOnly", || false);
///
/// let desc = FieldDescriptor::new("SecretOption", FieldMeta::new().with_show("adminOnly"));
/// assert!(desc.hidden(&conditions));
/// ```
#[derive(Default)]
pub struct ShowConditions {
	named: HashMap<String, ShowConditionFn>,
	globals: Vec<GlobalShowConditionFn>,
}

impl ShowConditions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a named condition. Conditions added under the same name
	/// replace one another.
	pub fn add_show_condition(&mut self, name: impl Into<String>, condition: impl Fn() -> bool + 'static) {
		self.named.insert(name.into(), Box::new(condition));
	}

	/// Registers a condition consulted for every field regardless of its show
	/// directives. Any global condition returning false hides the field.
	pub fn add_global_show_condition(&mut self, condition: impl Fn(&FieldDescriptor) -> bool + 'static) {
		self.globals.push(Box::new(condition));
	}

	fn globals_allow(&self, desc: &FieldDescriptor) -> bool {
		self.globals.iter().all(|condition| condition(desc))
	}
}
