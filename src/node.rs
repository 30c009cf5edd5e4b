//! HTML node tree built by the encoder.
//!
//! This is the boundary representation handed to [`Decorator`](crate::Decorator)
//! hooks and custom field builders. It is deliberately small: elements with
//! ordered attributes and children, plus text nodes. Serialization escapes
//! text and attribute values, so option labels and posted-back values cannot
//! break out of the markup.

use std::fmt::Write;

/// A single node in the built form tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
	Element(Element),
	Text(String),
}

impl Node {
	/// Returns the inner element, if this node is one.
	pub fn as_element(&self) -> Option<&Element> {
		match self {
			Node::Element(el) => Some(el),
			Node::Text(_) => None,
		}
	}

	/// Returns the text content, if this node is a text node.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Node::Element(_) => None,
			Node::Text(t) => Some(t),
		}
	}
}

impl From<Element> for Node {
	fn from(el: Element) -> Self {
		Node::Element(el)
	}
}

/// A named attribute on an [`Element`].
///
/// Boolean HTML attributes (`multiple`, `selected`, ...) are represented
/// with an empty value and render as `name=""`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
	pub name: String,
	pub value: String,
}

/// An HTML element with ordered attributes and children.
///
/// # Examples
///
/// ```
/// use formkit::node::Element;
///
/// let mut input = Element::new("input");
/// input.set_attr("type", "text");
/// input.set_attr("name", "Name");
/// assert_eq!(input.render(), r#"<input type="text" name="Name">"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
	pub tag: String,
	pub attrs: Vec<Attribute>,
	pub children: Vec<Node>,
}

/// Elements which never carry children and render without a closing tag.
const VOID_ELEMENTS: &[&str] = &["area", "br", "hr", "img", "input", "link", "meta"];

impl Element {
	/// Creates an empty element with the given tag name.
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			attrs: vec![],
			children: vec![],
		}
	}

	/// Creates an element carrying a single text child.
	pub fn with_text(tag: impl Into<String>, text: impl Into<String>) -> Self {
		let mut el = Self::new(tag);
		el.children.push(Node::Text(text.into()));
		el
	}

	/// Appends an attribute, replacing any existing attribute of the same name.
	pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into();
		let value = value.into();

		if let Some(attr) = self.attrs.iter_mut().find(|a| a.name == name) {
			attr.value = value;
			return;
		}

		self.attrs.push(Attribute { name, value });
	}

	/// Appends a boolean attribute (`multiple`, `selected`, `disabled`, ...).
	pub fn set_flag(&mut self, name: impl Into<String>) {
		self.set_attr(name, "");
	}

	/// Returns the value of the named attribute, if present.
	pub fn attr(&self, name: &str) -> Option<&str> {
		self.attrs
			.iter()
			.find(|a| a.name == name)
			.map(|a| a.value.as_str())
	}

	/// Returns true if the element carries the named attribute.
	pub fn has_attr(&self, name: &str) -> bool {
		self.attrs.iter().any(|a| a.name == name)
	}

	/// Adds classes to the element's `class` attribute, creating it if needed.
	///
	/// # Examples
	///
	/// ```
	/// use formkit::node::Element;
	///
	/// let mut div = Element::new("div");
	/// div.append_class(&["row", "form-group"]);
	/// div.append_class(&["pt-2"]);
	/// assert_eq!(div.attr("class"), Some("row form-group pt-2"));
	/// ```
	pub fn append_class(&mut self, classes: &[&str]) {
		let joined = classes.join(" ");

		if let Some(attr) = self.attrs.iter_mut().find(|a| a.name == "class") {
			attr.value.push(' ');
			attr.value.push_str(&joined);
			return;
		}

		self.attrs.push(Attribute {
			name: "class".to_string(),
			value: joined,
		});
	}

	/// Appends a child node.
	pub fn append_child(&mut self, child: impl Into<Node>) {
		self.children.push(child.into());
	}

	/// Moves all children of `other` onto the end of this element's children.
	pub fn adopt_children(&mut self, other: &mut Element) {
		self.children.append(&mut other.children);
	}

	fn is_void(&self) -> bool {
		VOID_ELEMENTS.contains(&self.tag.as_str())
	}

	/// Serializes the element to compact HTML.
	pub fn render(&self) -> String {
		let mut out = String::new();
		self.render_into(&mut out);
		out
	}

	/// Serializes the element to indented HTML, one node per line.
	pub fn render_pretty(&self) -> String {
		let mut out = String::new();
		self.render_pretty_into(&mut out, 0);
		out
	}

	fn open_tag(&self, out: &mut String) {
		out.push('<');
		out.push_str(&self.tag);

		for attr in &self.attrs {
			let _ = write!(out, " {}=\"{}\"", attr.name, escape_attribute(&attr.value));
		}

		out.push('>');
	}

	fn render_into(&self, out: &mut String) {
		self.open_tag(out);

		if self.is_void() {
			return;
		}

		for child in &self.children {
			match child {
				Node::Element(el) => el.render_into(out),
				Node::Text(t) => out.push_str(&escape_text(t)),
			}
		}

		let _ = write!(out, "</{}>", self.tag);
	}

	fn render_pretty_into(&self, out: &mut String, depth: usize) {
		let indent = "  ".repeat(depth);

		out.push_str(&indent);
		self.open_tag(out);

		if self.is_void() {
			return;
		}

		if self.children.is_empty() {
			let _ = write!(out, "</{}>", self.tag);
			return;
		}

		for child in &self.children {
			out.push('\n');

			match child {
				Node::Element(el) => el.render_pretty_into(out, depth + 1),
				Node::Text(t) => {
					out.push_str(&"  ".repeat(depth + 1));
					out.push_str(&escape_text(t));
				}
			}
		}

		out.push('\n');
		out.push_str(&indent);
		let _ = write!(out, "</{}>", self.tag);
	}
}

/// Escapes text content for inclusion in element bodies.
pub fn escape_text(value: &str) -> String {
	value
		.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}

/// Escapes a value for inclusion in a double-quoted attribute.
pub fn escape_attribute(value: &str) -> String {
	value
		.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_render_nested() {
		let mut label = Element::with_text("label", "Full Name");
		label.set_attr("for", "Name");

		let mut row = Element::new("div");
		row.append_child(label);

		assert_eq!(row.render(), r#"<div><label for="Name">Full Name</label></div>"#);
	}

	#[rstest]
	fn test_void_element_has_no_closing_tag() {
		let mut input = Element::new("input");
		input.set_attr("type", "checkbox");
		input.set_flag("checked");

		assert_eq!(input.render(), r#"<input type="checkbox" checked="">"#);
	}

	#[rstest]
	#[case("a & b", "a &amp; b")]
	#[case("<script>", "&lt;script&gt;")]
	fn test_escape_text(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(escape_text(input), expected);
	}

	#[rstest]
	fn test_escape_attribute_quotes() {
		let mut el = Element::new("input");
		el.set_attr("value", r#"say "hi""#);

		assert_eq!(el.render(), r#"<input value="say &quot;hi&quot;">"#);
	}

	#[rstest]
	fn test_set_attr_replaces_existing() {
		let mut el = Element::new("input");
		el.set_attr("type", "text");
		el.set_attr("type", "email");

		assert_eq!(el.attr("type"), Some("email"));
		assert_eq!(el.attrs.len(), 1);
	}

	#[rstest]
	fn test_render_pretty() {
		let mut sel = Element::new("select");
		sel.set_attr("name", "Pet");
		let mut opt = Element::with_text("option", "Dog");
		opt.set_attr("value", "dog");
		sel.append_child(opt);

		let expected = "<select name=\"Pet\">\n  <option value=\"dog\">\n    Dog\n  </option>\n</select>";
		assert_eq!(sel.render_pretty(), expected);
	}

	#[rstest]
	fn test_adopt_children() {
		let mut from = Element::new("div");
		from.append_child(Element::new("span"));
		from.append_child(Node::Text("x".to_string()));

		let mut to = Element::new("fieldset");
		to.adopt_children(&mut from);

		assert!(from.children.is_empty());
		assert_eq!(to.children.len(), 2);
	}
}
