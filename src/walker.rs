//! Shared recursive descent over a record's shape.
//!
//! Both directions drive the same traversal: the encoder to build elements,
//! the decoder to know which posted keys are expected. Centralizing it here
//! keeps the two in lock-step — in particular, a field hidden by a show
//! condition is skipped as a whole subtree, so it neither renders nor
//! accepts posted values.

use crate::field::{FieldDescriptor, ShowConditions};
use crate::value::{FieldValue, FormRecord};

/// Separator between structural field names in a field path.
pub const FIELD_SEPARATOR: &str = ".";

/// Extends a field path with the next structural name.
pub(crate) fn join_path(path: &str, name: &str) -> String {
	if path.is_empty() {
		name.to_string()
	} else {
		format!("{path}{FIELD_SEPARATOR}{name}")
	}
}

/// The element `name`/`id` exposed to HTML for a field path: the path itself,
/// with an optional caller-supplied prefix.
pub(crate) fn element_name(prefix: &str, path: &str) -> String {
	format!("{prefix}{path}")
}

/// Receives traversal events from [`Walker::walk`].
pub(crate) trait RecordVisitor {
	type Error;

	/// A group (nested record) is about to be descended into. Also called
	/// once for the record root with an empty path.
	fn enter_group(&mut self, path: &str, desc: &FieldDescriptor) -> Result<(), Self::Error>;

	/// The matching group has been fully visited.
	fn leave_group(&mut self, path: &str, desc: &FieldDescriptor) -> Result<(), Self::Error>;

	/// A visible leaf field.
	fn field(
		&mut self,
		path: &str,
		desc: FieldDescriptor,
		value: FieldValue<'_>,
	) -> Result<(), Self::Error>;
}

/// Depth-first traversal of a [`FormRecord`], skipping hidden subtrees.
pub(crate) struct Walker<'a> {
	conditions: &'a ShowConditions,
}

impl<'a> Walker<'a> {
	pub fn new(conditions: &'a ShowConditions) -> Self {
		Self { conditions }
	}

	pub fn walk<V: RecordVisitor>(
		&self,
		record: &mut dyn FormRecord,
		visitor: &mut V,
	) -> Result<(), V::Error> {
		let root = FieldDescriptor::root();

		visitor.enter_group("", &root)?;
		self.walk_record(record, "", visitor)?;
		visitor.leave_group("", &root)
	}

	fn walk_record<V: RecordVisitor>(
		&self,
		record: &mut dyn FormRecord,
		path: &str,
		visitor: &mut V,
	) -> Result<(), V::Error> {
		for slot in record.fields() {
			let desc = FieldDescriptor::new(slot.name, slot.meta);

			if desc.hidden(self.conditions) {
				tracing::trace!(field = slot.name, "skipping hidden field");
				continue;
			}

			let child_path = join_path(path, slot.name);

			match slot.value {
				FieldValue::Group(group) => {
					self.walk_group(group, &child_path, &desc, visitor)?;
				}
				FieldValue::Optional(optional) => {
					// allocate before descent, so optional sub-records
					// always render and decode
					let group = optional.get_or_insert_record();
					self.walk_group(group, &child_path, &desc, visitor)?;
				}
				value => visitor.field(&child_path, desc, value)?,
			}
		}

		Ok(())
	}

	fn walk_group<V: RecordVisitor>(
		&self,
		group: &mut dyn FormRecord,
		path: &str,
		desc: &FieldDescriptor,
		visitor: &mut V,
	) -> Result<(), V::Error> {
		visitor.enter_group(path, desc)?;
		self.walk_record(group, path, visitor)?;
		visitor.leave_group(path, desc)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::FieldMeta;
	use rstest::rstest;

	#[derive(Default)]
	struct Inner {
		line1: String,
	}

	impl FormRecord for Inner {
		fn fields(&mut self) -> Vec<crate::FieldSlot<'_>> {
			vec![crate::FieldSlot::new(
				"Line1",
				FieldMeta::new(),
				FieldValue::Text(&mut self.line1),
			)]
		}
	}

	#[derive(Default)]
	struct Outer {
		name: String,
		secret: String,
		inner: Inner,
		maybe: Option<Inner>,
	}

	impl FormRecord for Outer {
		fn fields(&mut self) -> Vec<crate::FieldSlot<'_>> {
			vec![
				crate::FieldSlot::new("Name", FieldMeta::new(), FieldValue::Text(&mut self.name)),
				crate::FieldSlot::new(
					"Secret",
					FieldMeta::new().with_show("-"),
					FieldValue::Text(&mut self.secret),
				),
				crate::FieldSlot::new("Inner", FieldMeta::new(), FieldValue::Group(&mut self.inner)),
				crate::FieldSlot::new(
					"Maybe",
					FieldMeta::new(),
					FieldValue::Optional(&mut self.maybe),
				),
			]
		}
	}

	#[derive(Default)]
	struct Recorder {
		events: Vec<String>,
	}

	impl RecordVisitor for Recorder {
		type Error = std::convert::Infallible;

		fn enter_group(&mut self, path: &str, _desc: &FieldDescriptor) -> Result<(), Self::Error> {
			self.events.push(format!("enter:{path}"));
			Ok(())
		}

		fn leave_group(&mut self, path: &str, _desc: &FieldDescriptor) -> Result<(), Self::Error> {
			self.events.push(format!("leave:{path}"));
			Ok(())
		}

		fn field(
			&mut self,
			path: &str,
			_desc: FieldDescriptor,
			_value: FieldValue<'_>,
		) -> Result<(), Self::Error> {
			self.events.push(format!("field:{path}"));
			Ok(())
		}
	}

	#[rstest]
	fn test_walk_order_and_paths() {
		let mut record = Outer::default();
		let conditions = ShowConditions::new();
		let mut recorder = Recorder::default();

		Walker::new(&conditions)
			.walk(&mut record, &mut recorder)
			.unwrap();

		assert_eq!(
			recorder.events,
			vec![
				"enter:",
				"field:Name",
				"enter:Inner",
				"field:Inner.Line1",
				"leave:Inner",
				"enter:Maybe",
				"field:Maybe.Line1",
				"leave:Maybe",
				"leave:",
			]
		);
		// the optional sub-record was allocated during the walk
		assert!(record.maybe.is_some());
	}

	#[rstest]
	fn test_hidden_subtree_skipped() {
		let mut conditions = ShowConditions::new();
		conditions.add_global_show_condition(|desc| desc.field_name != "Inner");

		let mut record = Outer::default();
		let mut recorder = Recorder::default();

		Walker::new(&conditions)
			.walk(&mut record, &mut recorder)
			.unwrap();

		assert!(!recorder.events.iter().any(|e| e.contains("Inner")));
		assert!(!recorder.events.iter().any(|e| e.contains("Secret")));
	}

	#[rstest]
	#[case("", "Name", "Name")]
	#[case("Address", "Line1", "Address.Line1")]
	fn test_join_path(#[case] path: &str, #[case] name: &str, #[case] expected: &str) {
		assert_eq!(join_path(path, name), expected);
	}
}
