//! The remote collaborators of the desk: identity provider, complaint
//! collection and blob storage.
//!
//! The UI only talks to the three traits below. Two implementations ship
//! with the crate: [`InMemoryBackend`] (tests and throw-away sessions) and
//! [`FileBackend`] (a directory of JSON documents). Both keep their state in
//! a [`Collections`] value behind a `tokio::sync::Mutex`, so they share the
//! write rules: server timestamps, ownership checks and account handling.

mod collections;
mod file;
mod memory;
mod password;

pub use collections::{Account, Collections, ServerClock};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
pub use password::PasswordHash;

use crate::domain::{
    Complaint, ComplaintEdit, ComplaintFilter, ComplaintId, NewComplaint, Query, Registration,
    Session, StatusUpdate, UserId,
};
use crate::error::{AuthError, BackendResult};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

/// The complaint collection.
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    /// Runs a query: equality filters, newest first, optional limit.
    async fn query(&self, query: Query) -> BackendResult<Vec<Complaint>>;

    /// Fetches one complaint.
    async fn get(&self, id: &ComplaintId) -> BackendResult<Option<Complaint>>;

    /// Stores a new complaint as `Pending` and returns it with its id and
    /// timestamps.
    async fn create(&self, new: NewComplaint) -> BackendResult<Complaint>;

    /// Rewrites category, description and image of a pending complaint.
    async fn update_details(&self, id: &ComplaintId, edit: ComplaintEdit)
        -> BackendResult<Complaint>;

    /// Sets status and admin comment and bumps `updated_at`.
    async fn update_status(&self, id: &ComplaintId, update: StatusUpdate)
        -> BackendResult<Complaint>;

    /// Removes a pending complaint.
    async fn delete(&self, id: &ComplaintId) -> BackendResult<()>;

    /// Complaints filed by `owner`, newest first.
    async fn list_by_owner(&self, owner: &UserId) -> BackendResult<Vec<Complaint>> {
        self.query(Query::owned_by(owner.clone())).await
    }

    /// Every complaint passing `filter`, newest first.
    async fn list_all(&self, filter: ComplaintFilter) -> BackendResult<Vec<Complaint>> {
        self.query(Query::all().with_filter(filter)).await
    }

    /// Number of complaints matching `query`.
    async fn count(&self, query: Query) -> BackendResult<usize> {
        Ok(self.query(query).await?.len())
    }
}

/// Accounts and the current session.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Creates an account with its profile and signs it in.
    async fn sign_up(&self, registration: Registration) -> Result<Session, AuthError>;

    /// Signs in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Ends the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// The signed-in account, if any.
    fn current(&self) -> Option<Session>;

    /// Notified with the new session on every sign-in and sign-out.
    fn subscribe(&self) -> watch::Receiver<Option<Session>>;
}

/// Binary object storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `path` and returns a URL that retrieves them.
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> BackendResult<String>;
}

/// The three collaborators bundled for the application.
#[derive(Clone)]
pub struct Backend {
    /// Complaint collection.
    pub complaints: Arc<dyn ComplaintRepository>,
    /// Identity provider.
    pub identity: Arc<dyn IdentityProvider>,
    /// Blob storage.
    pub blobs: Arc<dyn BlobStore>,
}

impl Backend {
    /// Uses one object for all three roles.
    pub fn from_shared<B>(backend: Arc<B>) -> Self
    where
        B: ComplaintRepository + IdentityProvider + BlobStore + 'static,
    {
        Self {
            complaints: backend.clone(),
            identity: backend.clone(),
            blobs: backend,
        }
    }

    /// A fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::from_shared(Arc::new(InMemoryBackend::new()))
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend").finish_non_exhaustive()
    }
}
