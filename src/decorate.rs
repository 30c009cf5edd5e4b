//! Presentation hooks applied to every built node.
//!
//! A [`Decorator`] customizes the elements the encoder builds, typically by
//! adding classes for a CSS framework. Each hook is invoked exactly once per
//! built node, with the element and the field's descriptor (including any
//! validation errors attached for redisplay). Every method defaults to a
//! no-op, so decorators implement only the hooks they care about.

use crate::field::FieldDescriptor;
use crate::node::Element;

/// Customizes nodes built by the [`Encoder`](crate::Encoder).
pub trait Decorator {
	/// The root `<div>` wrapping the whole form.
	fn root_node(&self, _el: &mut Element) {}

	/// Each `<fieldset>`, built for named nested records.
	fn fieldset(&self, _el: &mut Element, _field: &FieldDescriptor) {}

	/// The parent of each label, input and help text.
	fn row(&self, _el: &mut Element, _field: &FieldDescriptor) {}

	/// The `<div>` wrapping the input and help text within a row.
	fn field_wrapper(&self, _el: &mut Element, _field: &FieldDescriptor) {}

	/// The `<label>` for a form element.
	fn label(&self, _el: &mut Element, _field: &FieldDescriptor) {}

	/// The help text displayed below an input, from the `help` metadata.
	fn help_text(&self, _el: &mut Element, _field: &FieldDescriptor) {}

	/// An `<input type="text">` or equivalent (email, password, ...).
	fn text_field(&self, _el: &mut Element, _field: &FieldDescriptor) {}

	/// An `<input type="number">`.
	fn number_field(&self, _el: &mut Element, _field: &FieldDescriptor) {}

	/// An `<input type="checkbox">`, used for boolean fields.
	fn checkbox_field(&self, _el: &mut Element, _field: &FieldDescriptor) {}

	/// A `<textarea>`.
	fn textarea_field(&self, _el: &mut Element, _field: &FieldDescriptor) {}

	/// An `<input type="datetime-local">`.
	fn time_field(&self, _el: &mut Element, _field: &FieldDescriptor) {}

	/// A `<select>` dropdown.
	fn select_field(&self, _el: &mut Element, _field: &FieldDescriptor) {}

	/// An individual `<input type="radio">`.
	fn radio_button(&self, _el: &mut Element, _field: &FieldDescriptor) {}

	/// The inline error text displayed when a field failed validation.
	fn validation_text(&self, _el: &mut Element, _field: &FieldDescriptor) {}
}

/// The default decorator: applies no decoration at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDecorator;

impl Decorator for NullDecorator {}
