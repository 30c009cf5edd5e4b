//! Rendering a record as an HTML form tree.

use serde::de::DeserializeOwned;

use crate::data::FormData;
use crate::decorate::{Decorator, NullDecorator};
use crate::field::{FieldDescriptor, ShowConditions};
use crate::node::{Element, Node};
use crate::validate::{MemoryValidationStore, StoreError, ValidationStore};
use crate::value::{
	BooleanValue, FieldValue, FormRecord, NumberValue, RadioValue, SelectValue, TextValue,
};
use crate::walker::{RecordVisitor, Walker, element_name};

/// Failure modes of [`Encoder::encode`].
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
	/// An opaque collection could not be serialized to its JSON textarea.
	#[error("opaque collection could not be serialized: {0}")]
	Json(#[from] serde_json::Error),
	/// The validation store failed; propagated verbatim.
	#[error(transparent)]
	Store(#[from] StoreError),
	/// A custom field builder failed; propagated verbatim.
	#[error("custom field builder: {0}")]
	Custom(#[source] anyhow::Error),
}

/// Builds an HTML form from a [`FormRecord`].
///
/// The encoder deals with primitive kinds and nested records; unrecognized
/// collection shapes render as a JSON blob in a `<textarea>`. The rendering
/// of any field can be replaced by implementing
/// [`CustomField`](crate::CustomField).
///
/// Encoders hold only instance-scoped state; construct one per request.
///
/// # Examples
///
/// ```
/// use formkit::{Encoder, FieldMeta, FieldSlot, FieldValue, FormRecord};
/// use serde::Deserialize;
///
/// #[derive(Default, Deserialize)]
/// struct Profile {
/// 	name: String,
/// }
///
/// impl FormRecord for Profile {
/// 	fn fields(&mut self) -> Vec<FieldSlot<'_>> {
/// 		vec![FieldSlot::new(
/// 			"Name",
/// 			FieldMeta::new().with_name("Full Name"),
/// 			FieldValue::Text(&mut self.name),
/// 		)]
/// 	}
/// }
///
/// let mut encoder = Encoder::new();
/// let html = encoder.encode(&mut Profile::default()).unwrap();
/// assert!(html.contains(r#"<input type="text" name="Name" id="Name" value="">"#));
/// ```
pub struct Encoder {
	show_conditions: ShowConditions,
	decorator: Box<dyn Decorator>,
	validation_store: Box<dyn ValidationStore>,
	element_name_prefix: String,
	format: bool,
}

impl Encoder {
	/// An encoder with no decoration and an in-memory validation store.
	pub fn new() -> Self {
		Self {
			show_conditions: ShowConditions::new(),
			decorator: Box::new(NullDecorator),
			validation_store: Box::new(MemoryValidationStore::new()),
			element_name_prefix: String::new(),
			format: false,
		}
	}

	/// Uses `decorator` to style the output.
	pub fn with_decorator(mut self, decorator: impl Decorator + 'static) -> Self {
		self.decorator = Box::new(decorator);
		self
	}

	/// Emits indented HTML instead of compact output.
	pub fn set_format(&mut self, format: bool) {
		self.format = format;
	}

	/// Prefixes every element name and id with `prefix`.
	pub fn set_element_name_prefix(&mut self, prefix: impl Into<String>) {
		self.element_name_prefix = prefix.into();
	}

	/// Tells the encoder about validation errors from a preceding decode.
	/// Typically the store taken from the [`Decoder`](crate::Decoder) after
	/// a failed decode, or a persistent store shared across the redirect.
	pub fn set_validation_store(&mut self, store: Box<dyn ValidationStore>) {
		self.validation_store = store;
	}

	/// Takes the current validation store, leaving a fresh in-memory one.
	pub fn take_validation_store(&mut self) -> Box<dyn ValidationStore> {
		std::mem::replace(&mut self.validation_store, Box::new(MemoryValidationStore::new()))
	}

	/// Registers a named show condition. See
	/// [`ShowConditions::add_show_condition`].
	pub fn add_show_condition(&mut self, name: impl Into<String>, condition: impl Fn() -> bool + 'static) {
		self.show_conditions.add_show_condition(name, condition);
	}

	/// Registers a condition consulted for every field.
	pub fn add_global_show_condition(
		&mut self,
		condition: impl Fn(&crate::FieldDescriptor) -> bool + 'static,
	) {
		self.show_conditions.add_global_show_condition(condition);
	}

	/// Renders `record` as an HTML form.
	///
	/// If the validation store holds a record snapshot from a failed decode,
	/// it replaces `record` before rendering, so the user's in-flight input
	/// is redisplayed; the snapshot is consumed in the process. The store's
	/// errors are cleared after every encode, regardless of error state.
	pub fn encode<R>(&mut self, record: &mut R) -> Result<String, EncodeError>
	where
		R: FormRecord + DeserializeOwned,
	{
		let root = self.encode_to_node(record)?;

		Ok(if self.format {
			root.render_pretty()
		} else {
			root.render()
		})
	}

	/// Like [`Encoder::encode`], but returns the built node tree instead of
	/// serialized HTML, for callers embedding the form in a larger page.
	pub fn encode_to_node<R>(&mut self, record: &mut R) -> Result<Element, EncodeError>
	where
		R: FormRecord + DeserializeOwned,
	{
		let result = self.build_tree(record);
		let cleared = self.validation_store.clear_errors();

		let root = result?;
		cleared?;

		Ok(root)
	}

	fn build_tree<R>(&mut self, record: &mut R) -> Result<Element, EncodeError>
	where
		R: FormRecord + DeserializeOwned,
	{
		if let Some(snapshot) = self.validation_store.take_snapshot()? {
			// a malformed snapshot is dropped rather than failing the render
			if let Ok(restored) = serde_json::from_value::<R>(snapshot) {
				tracing::debug!("redisplaying record snapshot from validation store");
				*record = restored;
			}
		}

		let mut root = Element::new("div");
		self.decorator.root_node(&mut root);

		let mut visitor = EncodeVisitor {
			decorator: &*self.decorator,
			store: &*self.validation_store,
			prefix: &self.element_name_prefix,
			root,
			stack: vec![],
		};

		Walker::new(&self.show_conditions).walk(record, &mut visitor)?;

		Ok(visitor.root)
	}
}

impl Default for Encoder {
	fn default() -> Self {
		Self::new()
	}
}

struct EncodeVisitor<'a> {
	decorator: &'a dyn Decorator,
	store: &'a dyn ValidationStore,
	prefix: &'a str,
	root: Element,
	stack: Vec<Element>,
}

impl EncodeVisitor<'_> {
	fn container(&mut self) -> &mut Element {
		self.stack.last_mut().unwrap_or(&mut self.root)
	}
}

impl RecordVisitor for EncodeVisitor<'_> {
	type Error = EncodeError;

	fn enter_group(&mut self, _path: &str, _desc: &FieldDescriptor) -> Result<(), EncodeError> {
		self.stack.push(Element::new("div"));
		Ok(())
	}

	fn leave_group(&mut self, _path: &str, desc: &FieldDescriptor) -> Result<(), EncodeError> {
		let mut container = self.stack.pop().expect("unbalanced group traversal");

		// if every field in the group was hidden, emit no furniture at all
		if container.children.is_empty() {
			return Ok(());
		}

		if desc.build_fieldset() {
			let mut fieldset = Element::new("fieldset");

			let name = desc.display_name();
			if !name.is_empty() {
				fieldset.append_child(Element::with_text("legend", name));
			}

			fieldset.adopt_children(&mut container);
			self.decorator.fieldset(&mut fieldset, desc);
			self.container().append_child(fieldset);
		} else {
			let parent = self.stack.last_mut().unwrap_or(&mut self.root);
			parent.adopt_children(&mut container);
		}

		Ok(())
	}

	fn field(
		&mut self,
		path: &str,
		mut desc: FieldDescriptor,
		value: FieldValue<'_>,
	) -> Result<(), EncodeError> {
		let key = element_name(self.prefix, path);
		desc.validation_errors = self.store.errors(&key)?;

		if desc.hidden_input() {
			// hidden inputs carry no label, help or validation furniture
			let container = self.stack.last_mut().unwrap_or(&mut self.root);
			return build_input(container, &key, &desc, value, self.decorator);
		}

		let mut row = Element::new("div");
		build_label(&mut row, &key, &desc, self.decorator);

		let mut wrapper = Element::new("div");
		self.decorator.field_wrapper(&mut wrapper, &desc);

		build_input(&mut wrapper, &key, &desc, value, self.decorator)?;

		if !desc.validation_errors.is_empty() {
			build_validation_text(&mut wrapper, &desc, self.decorator);
		}

		build_help_text(&mut wrapper, &desc, self.decorator);

		row.append_child(wrapper);
		self.decorator.row(&mut row, &desc);
		self.container().append_child(row);

		Ok(())
	}
}

/// Builds the main element for one leaf into `parent`, dispatching on the
/// field's semantic kind.
fn build_input(
	parent: &mut Element,
	key: &str,
	desc: &FieldDescriptor,
	value: FieldValue<'_>,
	decorator: &dyn Decorator,
) -> Result<(), EncodeError> {
	match value {
		FieldValue::Custom(custom) => custom
			.build_form_element(key, parent, desc, decorator)
			.map_err(EncodeError::Custom),
		FieldValue::DateTime(time) => {
			let mut el = build_time_field(time, key, desc);
			decorator.time_field(&mut el, desc);
			parent.append_child(el);
			Ok(())
		}
		FieldValue::Select(select) => {
			let mut el = build_select_field(select, key);
			decorator.select_field(&mut el, desc);
			parent.append_child(el);
			Ok(())
		}
		FieldValue::Radio(radio) => {
			let el = build_radio_buttons(radio, key, desc, decorator);
			parent.append_child(el);
			Ok(())
		}
		FieldValue::Text(text) => {
			let mut el = build_string_field(text, key, desc);

			if desc.element() == "textarea" {
				decorator.textarea_field(&mut el, desc);
			} else {
				decorator.text_field(&mut el, desc);
			}

			parent.append_child(el);
			Ok(())
		}
		FieldValue::Number(number) => {
			let mut el = build_number_field(number, key, desc);
			decorator.number_field(&mut el, desc);
			parent.append_child(el);
			Ok(())
		}
		FieldValue::Boolean(boolean) => {
			let mut el = build_bool_field(boolean, key);
			decorator.checkbox_field(&mut el, desc);
			parent.append_child(el);
			Ok(())
		}
		FieldValue::Json(json) => {
			let mut el = Element::new("textarea");
			el.set_attr("name", key);
			el.set_attr("id", key);
			el.append_child(Node::Text(json.encode_json()?));
			decorator.textarea_field(&mut el, desc);
			parent.append_child(el);
			Ok(())
		}
		// groups are handled by the walker, never as leaves
		FieldValue::Group(_) | FieldValue::Optional(_) => unreachable!("group passed to build_input"),
	}
}

fn build_time_field(time: &chrono::NaiveDateTime, key: &str, desc: &FieldDescriptor) -> Element {
	let mut el = Element::new("input");
	el.set_attr("type", "datetime-local");
	el.set_attr("name", key);
	el.set_attr("id", key);
	el.set_attr("value", time.format(crate::TIME_FORMAT).to_string());

	if let Some(min) = desc.min() {
		el.set_attr("min", min);
	}

	if let Some(max) = desc.max() {
		el.set_attr("max", max);
	}

	el
}

fn build_number_field(number: &dyn NumberValue, key: &str, desc: &FieldDescriptor) -> Element {
	let mut el = Element::new("input");
	el.set_attr("type", "number");
	el.set_attr("name", key);
	el.set_attr("id", key);
	el.set_attr("value", number.display());

	if let Some(min) = desc.min() {
		el.set_attr("min", min);
	}

	if let Some(max) = desc.max() {
		el.set_attr("max", max);
	}

	if let Some(step) = desc.step() {
		el.set_attr("step", step);
	} else if number.is_float() {
		el.set_attr("step", "any");
	}

	el
}

fn build_string_field(text: &dyn TextValue, key: &str, desc: &FieldDescriptor) -> Element {
	let mut el = if desc.element() == "textarea" {
		let mut el = Element::new("textarea");
		el.set_attr("name", key);
		el.set_attr("id", key);
		el.append_child(Node::Text(text.get().to_string()));
		el
	} else {
		let mut el = Element::new("input");
		el.set_attr("type", desc.input_type(text.input_type()));
		el.set_attr("name", key);
		el.set_attr("id", key);
		el.set_attr("value", text.get());

		if let Some(pattern) = desc.pattern() {
			el.set_attr("pattern", pattern);
		}

		el
	};

	if let Some(placeholder) = desc.placeholder() {
		el.set_attr("placeholder", placeholder);
	}

	if desc.required() {
		el.set_attr("required", "required");
	}

	if let Some(min) = desc.min() {
		el.set_attr("minlength", min);
	}

	if let Some(max) = desc.max() {
		el.set_attr("maxlength", max);
	}

	el
}

fn build_bool_field(boolean: &dyn BooleanValue, key: &str) -> Element {
	let mut el = Element::new("input");
	el.set_attr("type", "checkbox");
	el.set_attr("name", key);
	el.set_attr("id", key);

	if boolean.get() {
		el.set_flag("checked");
	}

	el
}

fn build_select_field(select: &dyn SelectValue, key: &str) -> Element {
	let mut el = Element::new("select");
	el.set_attr("name", key);
	el.set_attr("id", key);

	if select.multiple() {
		el.set_flag("multiple");
	}

	let selected = select.selected();

	// optgroups keep the order in which their label first appears
	let mut groups: Vec<(String, Element)> = vec![];

	for opt in select.options() {
		let mut option = Element::new("option");
		option.set_attr("value", &opt.value);

		if opt.disabled {
			option.set_flag("disabled");
		}

		let checked = opt
			.checked
			.unwrap_or_else(|| selected.iter().any(|v| *v == opt.value));

		if checked {
			option.set_flag("selected");
		}

		for (name, value) in &opt.attrs {
			option.set_attr(name.clone(), value.clone());
		}

		option.append_child(Node::Text(opt.label));

		match opt.group {
			Some(label) => {
				if let Some((_, group)) = groups.iter_mut().find(|(l, _)| *l == label) {
					group.append_child(option);
				} else {
					let mut group = Element::new("optgroup");
					group.set_attr("label", &label);
					group.append_child(option);
					groups.push((label, group));
				}
			}
			None => el.append_child(option),
		}
	}

	for (_, group) in groups {
		el.append_child(group);
	}

	el
}

fn build_radio_buttons(
	radio: &dyn RadioValue,
	key: &str,
	desc: &FieldDescriptor,
	decorator: &dyn Decorator,
) -> Element {
	let mut el = Element::new("div");
	el.set_attr("id", key);

	let current = radio.current();

	for (i, opt) in radio.options().into_iter().enumerate() {
		let id = format!("{key}{i}");

		let mut input = Element::new("input");
		input.set_attr("type", "radio");
		input.set_attr("value", &opt.value);
		input.set_attr("id", &id);
		input.set_attr("name", key);

		if opt.disabled {
			input.set_flag("disabled");
		}

		for (name, value) in &opt.attrs {
			input.set_attr(name.clone(), value.clone());
		}

		let checked = opt.checked.unwrap_or(opt.value == current);

		if checked {
			input.set_flag("checked");
		}

		let mut label = Element::with_text("label", opt.label);
		label.set_attr("for", &id);

		decorator.label(&mut label, desc);
		decorator.radio_button(&mut input, desc);

		el.append_child(label);
		el.append_child(input);
	}

	el
}

fn build_label(row: &mut Element, key: &str, desc: &FieldDescriptor, decorator: &dyn Decorator) {
	let mut label = Element::with_text("label", desc.display_name());
	label.set_attr("for", key);
	decorator.label(&mut label, desc);
	row.append_child(label);
}

fn build_help_text(wrapper: &mut Element, desc: &FieldDescriptor, decorator: &dyn Decorator) {
	let mut el = Element::with_text("div", desc.help_text());
	decorator.help_text(&mut el, desc);
	wrapper.append_child(el);
}

fn build_validation_text(wrapper: &mut Element, desc: &FieldDescriptor, decorator: &dyn Decorator) {
	let messages: Vec<&str> = desc
		.validation_errors
		.iter()
		.map(|e| e.error.as_str())
		.collect();

	let mut el = Element::with_text("div", messages.join(", "));
	decorator.validation_text(&mut el, desc);
	wrapper.append_child(el);
}

/// A custom-encodable raw blob rendered as a bare `<textarea>`.
///
/// # Examples
///
/// ```
/// use formkit::{FieldDescriptor, FieldMeta, NullDecorator, Raw};
/// use formkit::node::Element;
/// use formkit::CustomField;
///
/// let raw = Raw("{}".to_string());
/// let mut parent = Element::new("div");
/// let desc = FieldDescriptor::new("Blob", FieldMeta::new());
/// raw.build_form_element("Blob", &mut parent, &desc, &NullDecorator).unwrap();
/// assert!(parent.render().contains("<textarea"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Raw(pub String);

impl crate::value::CustomField for Raw {
	fn build_form_element(
		&self,
		key: &str,
		parent: &mut Element,
		field: &FieldDescriptor,
		decorator: &dyn Decorator,
	) -> anyhow::Result<()> {
		let mut el = Element::new("textarea");
		el.set_attr("name", key);
		el.set_attr("id", key);
		el.append_child(Node::Text(self.0.clone()));
		decorator.textarea_field(&mut el, field);
		parent.append_child(el);
		Ok(())
	}

	fn decode_form_value(
		&mut self,
		_form: &FormData,
		_key: &str,
		values: &[String],
	) -> anyhow::Result<()> {
		if let Some(value) = values.first() {
			self.0 = value.clone();
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::FieldMeta;
	use crate::validate::{ValidationError, ValidationStore};
	use crate::value::{FieldSlot, SelectOption, TypedValue};
	use rstest::rstest;
	use serde::Deserialize;

	#[derive(Default, Deserialize)]
	struct Profile {
		name: String,
	}

	impl FormRecord for Profile {
		fn fields(&mut self) -> Vec<FieldSlot<'_>> {
			vec![FieldSlot::new(
				"Name",
				FieldMeta::new(),
				FieldValue::Text(&mut self.name),
			)]
		}
	}

	#[rstest]
	fn test_encode_single_text_field() {
		let mut record = Profile {
			name: "Jane Doe".to_string(),
		};

		let html = Encoder::new().encode(&mut record).unwrap();

		assert_eq!(
			html,
			concat!(
				r#"<div><fieldset><div><label for="Name">Name</label>"#,
				r#"<div><input type="text" name="Name" id="Name" value="Jane Doe">"#,
				r#"<div></div></div></div></fieldset></div>"#,
			)
		);
	}

	#[derive(Default, Deserialize)]
	struct FoodSelect(Vec<String>);

	impl SelectValue for FoodSelect {
		fn multiple(&self) -> bool {
			true
		}

		fn options(&self) -> Vec<SelectOption> {
			["burger", "pizza", "beans", "banana"]
				.into_iter()
				.map(|food| SelectOption::new(food, food))
				.collect()
		}

		fn selected(&self) -> Vec<String> {
			self.0.clone()
		}

		fn set_selected(&mut self, values: &[String]) -> anyhow::Result<()> {
			self.0 = values.to_vec();
			Ok(())
		}
	}

	#[derive(Default, Deserialize)]
	struct Meal {
		food: FoodSelect,
	}

	impl FormRecord for Meal {
		fn fields(&mut self) -> Vec<FieldSlot<'_>> {
			vec![FieldSlot::new(
				"Food",
				FieldMeta::new(),
				FieldValue::Select(&mut self.food),
			)]
		}
	}

	#[rstest]
	fn test_multi_select_marks_membership() {
		let mut record = Meal {
			food: FoodSelect(vec!["burger".to_string(), "pizza".to_string()]),
		};

		let html = Encoder::new().encode(&mut record).unwrap();

		assert!(html.contains(r#"<select name="Food" id="Food" multiple="">"#));
		assert!(html.contains(r#"<option value="burger" selected="">burger</option>"#));
		assert!(html.contains(r#"<option value="pizza" selected="">pizza</option>"#));
		assert!(html.contains(r#"<option value="beans">beans</option>"#));
		assert!(html.contains(r#"<option value="banana">banana</option>"#));
	}

	struct GroupedSelect;

	impl SelectValue for GroupedSelect {
		fn options(&self) -> Vec<SelectOption> {
			vec![
				SelectOption::new("none", "None"),
				SelectOption::new("dog", "Dog").with_group("Mammals"),
				SelectOption::new("cat", "Cat").with_group("Mammals"),
				SelectOption::new("gecko", "Gecko").with_group("Reptiles"),
			]
		}

		fn selected(&self) -> Vec<String> {
			vec!["cat".to_string()]
		}

		fn set_selected(&mut self, _values: &[String]) -> anyhow::Result<()> {
			Ok(())
		}
	}

	#[rstest]
	fn test_grouped_options_render_in_optgroups() {
		let el = build_select_field(&GroupedSelect, "Pet");
		let html = el.render();

		assert!(html.contains(r#"<option value="none">None</option>"#));

		let mammals = html.find(r#"<optgroup label="Mammals">"#).unwrap();
		let reptiles = html.find(r#"<optgroup label="Reptiles">"#).unwrap();
		assert!(mammals < reptiles);
		assert!(html.contains(r#"<option value="cat" selected="">Cat</option>"#));
	}

	#[derive(Default, Deserialize)]
	#[serde(default)]
	struct Flags {
		subscribed: bool,
		ratio: f64,
	}

	impl FormRecord for Flags {
		fn fields(&mut self) -> Vec<FieldSlot<'_>> {
			vec![
				FieldSlot::new(
					"Subscribed",
					FieldMeta::new(),
					FieldValue::Boolean(&mut self.subscribed),
				),
				FieldSlot::new("Ratio", FieldMeta::new(), FieldValue::Number(&mut self.ratio)),
			]
		}
	}

	#[rstest]
	fn test_checkbox_and_float_step() {
		let mut record = Flags {
			subscribed: true,
			ratio: 1.5,
		};

		let html = Encoder::new().encode(&mut record).unwrap();

		assert!(html.contains(
			r#"<input type="checkbox" name="Subscribed" id="Subscribed" checked="">"#
		));
		assert!(html.contains(
			r#"<input type="number" name="Ratio" id="Ratio" value="1.5" step="any">"#
		));
	}

	#[derive(Default, Deserialize)]
	struct WithHidden {
		token: String,
		secret: String,
	}

	impl FormRecord for WithHidden {
		fn fields(&mut self) -> Vec<FieldSlot<'_>> {
			vec![
				FieldSlot::new(
					"Token",
					FieldMeta::new().with_input_type("hidden"),
					FieldValue::Text(&mut self.token),
				),
				FieldSlot::new(
					"Secret",
					FieldMeta::new().with_show("-"),
					FieldValue::Text(&mut self.secret),
				),
			]
		}
	}

	#[rstest]
	fn test_hidden_input_has_no_furniture_and_hidden_field_is_absent() {
		let mut record = WithHidden {
			token: "tok".to_string(),
			secret: "shh".to_string(),
		};

		let html = Encoder::new().encode(&mut record).unwrap();

		assert!(html.contains(r#"<input type="hidden" name="Token" id="Token" value="tok">"#));
		assert!(!html.contains("<label for=\"Token\""));
		assert!(!html.contains("Secret"));
		assert!(!html.contains("shh"));
	}

	#[derive(Default, Deserialize)]
	struct AllHidden {
		secret: String,
	}

	impl FormRecord for AllHidden {
		fn fields(&mut self) -> Vec<FieldSlot<'_>> {
			vec![FieldSlot::new(
				"Secret",
				FieldMeta::new().with_show("-"),
				FieldValue::Text(&mut self.secret),
			)]
		}
	}

	#[rstest]
	fn test_fully_hidden_record_emits_no_fieldset() {
		let html = Encoder::new().encode(&mut AllHidden::default()).unwrap();
		assert_eq!(html, "<div></div>");
	}

	#[rstest]
	fn test_show_conditions() {
		#[derive(Default, Deserialize)]
		struct Gated {
			visible: String,
			invisible: String,
		}

		impl FormRecord for Gated {
			fn fields(&mut self) -> Vec<FieldSlot<'_>> {
				vec![
					FieldSlot::new(
						"AddressLine1",
						FieldMeta::new().with_show("visible"),
						FieldValue::Text(&mut self.visible),
					),
					FieldSlot::new(
						"PostCode",
						FieldMeta::new().with_show("invisible"),
						FieldValue::Text(&mut self.invisible),
					),
				]
			}
		}

		let mut encoder = Encoder::new();
		encoder.add_show_condition("visible", || true);
		encoder.add_show_condition("invisible", || false);

		let html = encoder.encode(&mut Gated::default()).unwrap();

		assert!(html.contains("AddressLine1"));
		assert!(!html.contains("PostCode"));
	}

	#[rstest]
	fn test_validation_errors_rendered_then_cleared() {
		let mut store = MemoryValidationStore::new();
		store
			.add_error(
				"Name",
				ValidationError {
					error: "must not be empty".to_string(),
					value: TypedValue::Text(String::new()),
				},
			)
			.unwrap();

		let mut encoder = Encoder::new();
		encoder.set_validation_store(Box::new(store));

		let html = encoder.encode(&mut Profile::default()).unwrap();
		assert!(html.contains("must not be empty"));

		// errors are cleared after the encode, so a rerender is clean
		let html = encoder.encode(&mut Profile::default()).unwrap();
		assert!(!html.contains("must not be empty"));
	}

	#[rstest]
	fn test_snapshot_redisplayed_and_consumed() {
		let mut store = MemoryValidationStore::new();
		store
			.set_snapshot(serde_json::json!({"name": "typed by user"}))
			.unwrap();

		let mut encoder = Encoder::new();
		encoder.set_validation_store(Box::new(store));

		let mut record = Profile {
			name: "from database".to_string(),
		};

		let html = encoder.encode(&mut record).unwrap();
		assert!(html.contains("typed by user"));
		assert_eq!(record.name, "typed by user");

		let mut record = Profile {
			name: "from database".to_string(),
		};
		let html = encoder.encode(&mut record).unwrap();
		assert!(html.contains("from database"));
	}

	#[rstest]
	fn test_textarea_and_attributes() {
		#[derive(Default, Deserialize)]
		struct Doc {
			description: String,
			country: String,
		}

		impl FormRecord for Doc {
			fn fields(&mut self) -> Vec<FieldSlot<'_>> {
				vec![
					FieldSlot::new(
						"Description",
						FieldMeta::new().with_element("textarea"),
						FieldValue::Text(&mut self.description),
					),
					FieldSlot::new(
						"CountryCode",
						FieldMeta::new()
							.with_pattern("[A-Za-z]{3}")
							.with_placeholder("GBR")
							.required(),
						FieldValue::Text(&mut self.country),
					),
				]
			}
		}

		let mut record = Doc {
			description: "multi\nline".to_string(),
			country: String::new(),
		};

		let html = Encoder::new().encode(&mut record).unwrap();

		assert!(html.contains(
			r#"<textarea name="Description" id="Description">multi
line</textarea>"#
		));
		assert!(html.contains(r#"pattern="[A-Za-z]{3}""#));
		assert!(html.contains(r#"placeholder="GBR""#));
		assert!(html.contains(r#"required="required""#));
	}

	#[rstest]
	fn test_element_name_prefix() {
		let mut encoder = Encoder::new();
		encoder.set_element_name_prefix("billing-");

		let html = encoder.encode(&mut Profile::default()).unwrap();
		assert!(html.contains(r#"name="billing-Name""#));
	}

	#[rstest]
	fn test_embedded_group_promoted() {
		#[derive(Default, Deserialize)]
		struct Embedded {
			kind: String,
		}

		impl FormRecord for Embedded {
			fn fields(&mut self) -> Vec<FieldSlot<'_>> {
				vec![FieldSlot::new(
					"Type",
					FieldMeta::new(),
					FieldValue::Text(&mut self.kind),
				)]
			}
		}

		#[derive(Default, Deserialize)]
		struct Outer {
			embedded: Embedded,
		}

		impl FormRecord for Outer {
			fn fields(&mut self) -> Vec<FieldSlot<'_>> {
				vec![FieldSlot::new(
					"EmbeddedStruct",
					FieldMeta::new().anonymous(),
					FieldValue::Group(&mut self.embedded),
				)]
			}
		}

		let html = Encoder::new().encode(&mut Outer::default()).unwrap();

		// promoted: the embedded record's field is in the root fieldset,
		// with no fieldset of its own, but the path still nests
		assert_eq!(html.matches("<fieldset>").count(), 1);
		assert!(html.contains(r#"name="EmbeddedStruct.Type""#));
	}
}
