//! Credential store and blob storage providers for Codex Forge
//!
//! These are the core-facing interfaces to the external collaborators that
//! hold bearer credentials and persist artifact bytes. The entry pipeline
//! only sees the traits; the Drive-backed implementations live here so the
//! HTTP details stay out of the orchestration core.

pub mod blob;
pub mod credentials;
pub mod drive;
pub mod error;

pub use blob::{mime_for_filename, BlobStore, ObjectMetadata, StoredObject};
pub use credentials::{with_credential_refresh, CredentialStore, MemoryCredentialStore};
pub use drive::DriveStore;
pub use error::{Result, StorageError};
