use super::collections::Collections;
use super::{BlobStore, ComplaintRepository, IdentityProvider};
use crate::domain::{
    Complaint, ComplaintEdit, ComplaintId, NewComplaint, Query, Registration, Session,
    StatusUpdate,
};
use crate::error::{AuthError, BackendResult};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{watch, Mutex};

/// Backend that lives only as long as the process. Used by tests and by
/// `--backend memory`.
pub struct InMemoryBackend {
    inner: Mutex<Inner>,
    session: watch::Sender<Option<Session>>,
}

#[derive(Default)]
struct Inner {
    collections: Collections,
    blobs: HashMap<String, Vec<u8>>,
}

impl InMemoryBackend {
    /// An empty backend with nobody signed in.
    pub fn new() -> Self {
        Self::with_collections(Collections::default())
    }

    /// Starts from existing collections.
    pub fn with_collections(collections: Collections) -> Self {
        let (session, _) = watch::channel(None);
        Self {
            inner: Mutex::new(Inner {
                collections,
                blobs: HashMap::new(),
            }),
            session,
        }
    }

    /// Bytes stored under `path`.
    pub async fn blob(&self, path: &str) -> Option<Vec<u8>> {
        self.inner.lock().await.blobs.get(path).cloned()
    }

    /// Number of stored blobs.
    pub async fn blob_count(&self) -> usize {
        self.inner.lock().await.blobs.len()
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ComplaintRepository for InMemoryBackend {
    async fn query(&self, query: Query) -> BackendResult<Vec<Complaint>> {
        Ok(self.inner.lock().await.collections.query(&query))
    }

    async fn get(&self, id: &ComplaintId) -> BackendResult<Option<Complaint>> {
        Ok(self.inner.lock().await.collections.get(id))
    }

    async fn create(&self, new: NewComplaint) -> BackendResult<Complaint> {
        Ok(self.inner.lock().await.collections.create(new))
    }

    async fn update_details(
        &self,
        id: &ComplaintId,
        edit: ComplaintEdit,
    ) -> BackendResult<Complaint> {
        self.inner.lock().await.collections.update_details(id, edit)
    }

    async fn update_status(
        &self,
        id: &ComplaintId,
        update: StatusUpdate,
    ) -> BackendResult<Complaint> {
        self.inner.lock().await.collections.update_status(id, update)
    }

    async fn delete(&self, id: &ComplaintId) -> BackendResult<()> {
        self.inner.lock().await.collections.delete(id)
    }
}

#[async_trait]
impl IdentityProvider for InMemoryBackend {
    async fn sign_up(&self, registration: Registration) -> Result<Session, AuthError> {
        let account = self.inner.lock().await.collections.sign_up(registration)?;
        let session = account.session();
        self.session.send_replace(Some(session.clone()));
        Ok(session)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let session = self.inner.lock().await.collections.sign_in(email, password)?;
        self.session.send_replace(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.session.send_replace(None);
        Ok(())
    }

    fn current(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }
}

#[async_trait]
impl BlobStore for InMemoryBackend {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> BackendResult<String> {
        self.inner
            .lock()
            .await
            .blobs
            .insert(path.to_string(), bytes);
        Ok(format!("memory:///{path}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Role, Status, UserId};

    fn student() -> Registration {
        Registration {
            name: "Ravi".into(),
            email: "ravi@campus.edu".into(),
            password: "password1".into(),
            role: Role::Student,
        }
    }

    #[tokio::test]
    async fn sign_up_signs_in_and_notifies() {
        let backend = InMemoryBackend::new();
        let mut rx = backend.subscribe();
        assert!(backend.current().is_none());

        let session = backend.sign_up(student()).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref(), Some(&session));
        assert_eq!(backend.current(), Some(session));

        backend.sign_out().await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }

    #[tokio::test]
    async fn failed_sign_in_keeps_session() {
        let backend = InMemoryBackend::new();
        backend.sign_up(student()).await.unwrap();
        backend.sign_out().await.unwrap();
        let err = backend.sign_in("ravi@campus.edu", "nope123").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "The password is invalid or the user does not have a password."
        );
        assert!(backend.current().is_none());
    }

    #[tokio::test]
    async fn repository_round_trip() {
        let backend = InMemoryBackend::new();
        let owner = UserId("u1".into());
        let created = backend
            .create(NewComplaint {
                submitter_id: owner.clone(),
                submitter_email: "u1@campus.edu".into(),
                category: Category::Electricity,
                description: "Fan not working".into(),
                image_url: None,
            })
            .await
            .unwrap();
        assert_eq!(created.status, Status::Pending);

        let mine = backend.list_by_owner(&owner).await.unwrap();
        assert_eq!(mine, vec![created.clone()]);
        assert_eq!(
            backend.count(Query::all().with_status(Status::Pending)).await.unwrap(),
            1
        );

        backend.delete(&created.id).await.unwrap();
        assert!(backend.get(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn uploads_are_retrievable() {
        let backend = InMemoryBackend::new();
        let url = backend.upload("complaints/u1/1_a.png", vec![1, 2]).await.unwrap();
        assert_eq!(url, "memory:///complaints/u1/1_a.png");
        assert_eq!(backend.blob("complaints/u1/1_a.png").await, Some(vec![1, 2]));
    }
}
