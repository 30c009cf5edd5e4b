//! Posted form values, keyed by element name.

use std::collections::HashMap;

/// A multimap of posted form values, as produced by an HTML form submission.
///
/// How the values arrive (urlencoded body, multipart, query string) is the
/// caller's concern; the decoder only needs the key/value pairs.
///
/// # Examples
///
/// ```
/// use formkit::FormData;
///
/// let mut form = FormData::new();
/// form.set("Age", "25");
/// form.append("FavouriteFoods", "burger");
/// form.append("FavouriteFoods", "pizza");
///
/// assert_eq!(form.get("Age"), Some("25"));
/// assert_eq!(form.get_all("FavouriteFoods").unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormData {
	values: HashMap<String, Vec<String>>,
}

impl FormData {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces all values for `key` with a single value.
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.values.insert(key.into(), vec![value.into()]);
	}

	/// Appends a value for `key`, keeping any existing ones.
	pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.values.entry(key.into()).or_default().push(value.into());
	}

	/// The first posted value for `key`, if any.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.values
			.get(key)
			.and_then(|vals| vals.first())
			.map(String::as_str)
	}

	/// All posted values for `key`, if any were posted.
	pub fn get_all(&self, key: &str) -> Option<&[String]> {
		self.values.get(key).map(Vec::as_slice)
	}

	pub fn contains(&self, key: &str) -> bool {
		self.values.contains_key(key)
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut form = FormData::new();

		for (key, value) in iter {
			form.append(key, value);
		}

		form
	}
}
