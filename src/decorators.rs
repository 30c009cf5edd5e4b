//! Ready-made decorators for common CSS frameworks.

use crate::decorate::Decorator;
use crate::field::FieldDescriptor;
use crate::node::Element;

/// Lays forms out on the Bootstrap 4 grid: labels in a 4-column block,
/// inputs in an 8-column block, `form-control` on the inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bootstrap4Decorator;

impl Bootstrap4Decorator {
	fn col4(el: &mut Element) {
		el.append_class(&["col-md-4 col-12"]);
	}

	fn col8(el: &mut Element) {
		el.append_class(&["col-md-8 col-12"]);
	}

	fn form_control(el: &mut Element) {
		el.append_class(&["form-control"]);
	}
}

impl Decorator for Bootstrap4Decorator {
	fn row(&self, el: &mut Element, _field: &FieldDescriptor) {
		el.append_class(&["row", "form-group"]);
	}

	fn field_wrapper(&self, el: &mut Element, _field: &FieldDescriptor) {
		Self::col8(el);
	}

	fn label(&self, el: &mut Element, _field: &FieldDescriptor) {
		Self::col4(el);
	}

	fn help_text(&self, el: &mut Element, _field: &FieldDescriptor) {
		el.append_class(&["small mt-1"]);
	}

	fn text_field(&self, el: &mut Element, _field: &FieldDescriptor) {
		Self::form_control(el);
	}

	fn number_field(&self, el: &mut Element, _field: &FieldDescriptor) {
		Self::form_control(el);
	}

	fn textarea_field(&self, el: &mut Element, _field: &FieldDescriptor) {
		Self::form_control(el);
	}

	fn time_field(&self, el: &mut Element, _field: &FieldDescriptor) {
		Self::form_control(el);
	}

	fn select_field(&self, el: &mut Element, _field: &FieldDescriptor) {
		Self::form_control(el);
	}

	fn validation_text(&self, el: &mut Element, _field: &FieldDescriptor) {
		el.append_class(&["invalid-feedback", "d-block"]);
	}
}
