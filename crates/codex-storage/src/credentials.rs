//! Bearer credential storage
//!
//! The credential store is the only shared mutable resource in the system.
//! All three operations are atomic with respect to concurrent readers: a
//! reader observes either the old or the new token, never a torn value.
//! There is deliberately no module-level token variable anywhere in the
//! core; every consumer receives a store handle.

use crate::error::{Result, StorageError};
use async_trait::async_trait;
use std::future::Future;
use tokio::sync::RwLock;
use tracing::debug;

/// Async, atomic storage for the current bearer token
///
/// A provider-backed implementation may acquire a fresh token inside
/// `get()` after `remove()` has cleared the cached one; that is what makes
/// the refresh-and-retry combinator below work end to end.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read the current token, if any
    async fn get(&self) -> Result<Option<String>>;

    /// Replace the current token
    async fn set(&self, token: String) -> Result<()>;

    /// Discard the current token
    async fn remove(&self) -> Result<()>;
}

/// In-memory credential store backed by an `RwLock`
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor with an initial token
    pub fn with_token(token: impl Into<String>) -> Self {
        MemoryCredentialStore {
            token: RwLock::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self) -> Result<Option<String>> {
        Ok(self.token.read().await.clone())
    }

    async fn set(&self, token: String) -> Result<()> {
        *self.token.write().await = Some(token);
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        *self.token.write().await = None;
        Ok(())
    }
}

/// Run a credentialed operation with exactly one refresh-and-retry
///
/// `op` receives the current token. If it fails with a credential error
/// (an expired or rejected token), the token is removed from the store,
/// re-read (a provider-backed store may mint a new one), and `op` runs one
/// more time. Any second failure, and any non-credential failure, is
/// terminal.
pub async fn with_credential_refresh<T, F, Fut>(
    store: &dyn CredentialStore,
    op: F,
) -> Result<T>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let token = store.get().await?.ok_or(StorageError::MissingCredential)?;
    match op(token).await {
        Err(err) if err.is_credential() => {
            debug!("credential rejected, refreshing and retrying once");
            store.remove().await?;
            let fresh = store.get().await?.ok_or(StorageError::MissingCredential)?;
            op(fresh).await
        }
        other => other,
    }
}
