//! A validation store persisted as JSON files in a directory.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::validate::{StoreError, ValidationError, ValidationStore};

/// A [`ValidationStore`] persisted under a directory, for carrying validation
/// state across a POST-redirect-GET round trip.
///
/// Two files are kept per store key: `<key>.errors.json` holding the field
/// error map, and `<key>.snapshot.json` holding the in-flight record. The key
/// should identify one user's view of one form, typically a session id joined
/// with a form name. Taking the snapshot deletes its file, so it is consumed
/// exactly once.
///
/// # Examples
///
/// ```no_run
/// use formkit::stores::file::FileValidationStore;
/// use formkit::{Decoder, FormData};
///
/// let store = FileValidationStore::new("/var/lib/myapp/forms", "session123.signup");
/// let mut decoder = Decoder::new(FormData::new());
/// decoder.set_validation_store(Box::new(store));
/// ```
#[derive(Debug, Clone)]
pub struct FileValidationStore {
	directory: PathBuf,
	key: String,
}

impl FileValidationStore {
	/// A store rooted at `directory`, scoped to `key`. The directory is
	/// created on first write.
	pub fn new(directory: impl Into<PathBuf>, key: impl Into<String>) -> Self {
		Self {
			directory: directory.into(),
			key: key.into(),
		}
	}

	fn errors_path(&self) -> PathBuf {
		self.directory.join(format!("{}.errors.json", self.key))
	}

	fn snapshot_path(&self) -> PathBuf {
		self.directory.join(format!("{}.snapshot.json", self.key))
	}

	fn read_errors(&self) -> Result<HashMap<String, Vec<ValidationError>>, StoreError> {
		match fs::read(self.errors_path()) {
			Ok(raw) => Ok(serde_json::from_slice(&raw)?),
			Err(err) if err.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
			Err(err) => Err(err.into()),
		}
	}

	fn write_json(&self, path: &Path, value: &impl serde::Serialize) -> Result<(), StoreError> {
		fs::create_dir_all(&self.directory)?;
		fs::write(path, serde_json::to_vec(value)?)?;
		Ok(())
	}
}

fn remove_if_present(path: &Path) -> Result<(), StoreError> {
	match fs::remove_file(path) {
		Ok(()) => Ok(()),
		Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
		Err(err) => Err(err.into()),
	}
}

impl ValidationStore for FileValidationStore {
	fn add_error(&mut self, field: &str, error: ValidationError) -> Result<(), StoreError> {
		let mut errors = self.read_errors()?;
		errors.entry(field.to_string()).or_default().push(error);
		self.write_json(&self.errors_path(), &errors)
	}

	fn errors(&self, field: &str) -> Result<Vec<ValidationError>, StoreError> {
		Ok(self.read_errors()?.remove(field).unwrap_or_default())
	}

	fn clear_errors(&mut self) -> Result<(), StoreError> {
		remove_if_present(&self.errors_path())
	}

	fn set_snapshot(&mut self, snapshot: serde_json::Value) -> Result<(), StoreError> {
		self.write_json(&self.snapshot_path(), &snapshot)
	}

	fn take_snapshot(&mut self) -> Result<Option<serde_json::Value>, StoreError> {
		let path = self.snapshot_path();

		match fs::read(&path) {
			Ok(raw) => {
				let snapshot = serde_json::from_slice(&raw)?;
				remove_if_present(&path)?;
				Ok(Some(snapshot))
			}
			Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
			Err(err) => Err(err.into()),
		}
	}
}
