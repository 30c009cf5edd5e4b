//! Validation store backends that outlive a single request.
//!
//! The default [`MemoryValidationStore`](crate::MemoryValidationStore) only
//! works when the failed decode and the redisplaying encode share one store
//! instance. In a POST-redirect-GET flow they usually do not, so errors and
//! the record snapshot must be persisted somewhere keyed to the visitor's
//! session. [`FileValidationStore`](file::FileValidationStore) is a
//! ready-made backend over a directory; session-cookie plumbing and key
//! choice remain the caller's concern.

pub mod file;
