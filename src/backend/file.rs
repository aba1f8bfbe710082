//! A directory of JSON documents.
//!
//! Layout under the data directory:
//!
//! ```text
//! complaints.json   array of complaints
//! accounts.json     array of accounts (salted password digests)
//! blobs/            uploaded files, addressed by their storage path
//! ```
//!
//! Every write replaces the affected collection file atomically: the new
//! contents go to a temporary sibling which is then renamed over the old
//! file.

use super::collections::{Account, Collections};
use super::{BlobStore, ComplaintRepository, IdentityProvider};
use crate::domain::{
    Complaint, ComplaintEdit, ComplaintId, NewComplaint, Query, Registration, Session,
    StatusUpdate,
};
use crate::error::{AuthError, BackendError, BackendResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use tokio::sync::{watch, Mutex};

const COMPLAINTS_FILE: &str = "complaints.json";
const ACCOUNTS_FILE: &str = "accounts.json";
const BLOB_DIR: &str = "blobs";

/// Backend persisted as JSON files in a directory.
pub struct FileBackend {
    dir: PathBuf,
    collections: Mutex<Collections>,
    session: watch::Sender<Option<Session>>,
}

impl FileBackend {
    /// Opens `dir`, creating it when missing. Missing collection files read
    /// as empty collections.
    pub async fn open(dir: impl Into<PathBuf>) -> BackendResult<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(dir.join(BLOB_DIR)).await?;
        let complaints: Vec<Complaint> = read_collection(&dir.join(COMPLAINTS_FILE)).await?;
        let accounts: Vec<Account> = read_collection(&dir.join(ACCOUNTS_FILE)).await?;
        tracing::info!(
            dir = %dir.display(),
            complaints = complaints.len(),
            accounts = accounts.len(),
            "opened file store"
        );
        let (session, _) = watch::channel(None);
        Ok(Self {
            dir,
            collections: Mutex::new(Collections::from_documents(complaints, accounts)),
            session,
        })
    }

    /// The data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn save_complaints(&self, collections: &Collections) -> BackendResult<()> {
        let docs: Vec<&Complaint> = collections.complaints().collect();
        write_collection(&self.dir.join(COMPLAINTS_FILE), &docs).await
    }

    async fn save_accounts(&self, collections: &Collections) -> BackendResult<()> {
        let docs: Vec<&Account> = collections.accounts().collect();
        write_collection(&self.dir.join(ACCOUNTS_FILE), &docs).await
    }
}

async fn read_collection<T: DeserializeOwned>(path: &Path) -> BackendResult<Vec<T>> {
    match tokio::fs::read(path).await {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

async fn write_collection<T: Serialize>(path: &Path, docs: &[T]) -> BackendResult<()> {
    let json = serde_json::to_vec_pretty(docs)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

/// Resolves a storage path below `root`, refusing anything that would
/// leave it.
fn blob_file(root: &Path, path: &str) -> BackendResult<PathBuf> {
    let rel = Path::new(path);
    let clean = rel
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !clean || path.is_empty() {
        return Err(BackendError::PermissionDenied(format!(
            "invalid storage path {path:?}"
        )));
    }
    Ok(root.join(rel))
}

#[async_trait]
impl ComplaintRepository for FileBackend {
    async fn query(&self, query: Query) -> BackendResult<Vec<Complaint>> {
        Ok(self.collections.lock().await.query(&query))
    }

    async fn get(&self, id: &ComplaintId) -> BackendResult<Option<Complaint>> {
        Ok(self.collections.lock().await.get(id))
    }

    async fn create(&self, new: NewComplaint) -> BackendResult<Complaint> {
        let mut collections = self.collections.lock().await;
        let mut next = collections.clone();
        let complaint = next.create(new);
        self.save_complaints(&next).await?;
        *collections = next;
        tracing::debug!(id = %complaint.id, "complaint stored");
        Ok(complaint)
    }

    async fn update_details(
        &self,
        id: &ComplaintId,
        edit: ComplaintEdit,
    ) -> BackendResult<Complaint> {
        let mut collections = self.collections.lock().await;
        let mut next = collections.clone();
        let complaint = next.update_details(id, edit)?;
        self.save_complaints(&next).await?;
        *collections = next;
        Ok(complaint)
    }

    async fn update_status(
        &self,
        id: &ComplaintId,
        update: StatusUpdate,
    ) -> BackendResult<Complaint> {
        let mut collections = self.collections.lock().await;
        let mut next = collections.clone();
        let complaint = next.update_status(id, update)?;
        self.save_complaints(&next).await?;
        *collections = next;
        Ok(complaint)
    }

    async fn delete(&self, id: &ComplaintId) -> BackendResult<()> {
        let mut collections = self.collections.lock().await;
        let mut next = collections.clone();
        next.delete(id)?;
        self.save_complaints(&next).await?;
        *collections = next;
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for FileBackend {
    async fn sign_up(&self, registration: Registration) -> Result<Session, AuthError> {
        let mut collections = self.collections.lock().await;
        let mut next = collections.clone();
        let account = next.sign_up(registration)?;
        self.save_accounts(&next)
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;
        *collections = next;
        drop(collections);

        let session = account.session();
        tracing::info!(user = %session.user_id, role = session.role.label(), "account created");
        self.session.send_replace(Some(session.clone()));
        Ok(session)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let session = self.collections.lock().await.sign_in(email, password)?;
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
impl BlobStore for FileBackend {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> BackendResult<String> {
        let root = self.dir.join(BLOB_DIR);
        let target = blob_file(&root, path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &bytes).await?;
        let absolute = tokio::fs::canonicalize(&target).await?;
        tracing::debug!(path, bytes = bytes.len(), "blob stored");
        Ok(format!("file://{}", absolute.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Role, Status, UserId};

    fn new_complaint() -> NewComplaint {
        NewComplaint {
            submitter_id: UserId("u1".into()),
            submitter_email: "u1@campus.edu".into(),
            category: Category::Hostel,
            description: "Broken window in room 12".into(),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBackend::open(dir.path()).await.unwrap();
        let created = store.create(new_complaint()).await.unwrap();
        store
            .update_status(
                &created.id,
                StatusUpdate {
                    status: Status::Resolved,
                    admin_comment: "Glass replaced".into(),
                },
            )
            .await
            .unwrap();
        store
            .sign_up(Registration {
                name: "Warden".into(),
                email: "warden@campus.edu".into(),
                password: "strongpass".into(),
                role: Role::Admin,
            })
            .await
            .unwrap();
        drop(store);

        let reopened = FileBackend::open(dir.path()).await.unwrap();
        let loaded = reopened.get(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, Status::Resolved);
        assert_eq!(loaded.admin_comment.as_deref(), Some("Glass replaced"));
        assert!(reopened.current().is_none());
        let session = reopened
            .sign_in("warden@campus.edu", "strongpass")
            .await
            .unwrap();
        assert!(session.is_admin());

        let raw = std::fs::read_to_string(dir.path().join(ACCOUNTS_FILE)).unwrap();
        assert!(!raw.contains("strongpass"));
        assert!(!dir.path().join("complaints.json.tmp").exists());
    }

    #[tokio::test]
    async fn rejected_write_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBackend::open(dir.path()).await.unwrap();
        let created = store.create(new_complaint()).await.unwrap();
        store
            .update_status(
                &created.id,
                StatusUpdate {
                    status: Status::InProgress,
                    admin_comment: String::new(),
                },
            )
            .await
            .unwrap();
        let before = std::fs::read_to_string(dir.path().join(COMPLAINTS_FILE)).unwrap();

        assert!(store.delete(&created.id).await.is_err());
        let after = std::fs::read_to_string(dir.path().join(COMPLAINTS_FILE)).unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn blobs_get_file_urls() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBackend::open(dir.path()).await.unwrap();
        let url = store
            .upload("complaints/u1/17_tap.png", b"png".to_vec())
            .await
            .unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("complaints/u1/17_tap.png"));
        assert!(store.upload("../escape.png", vec![1]).await.is_err());
    }

    #[tokio::test]
    async fn malformed_collection_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(COMPLAINTS_FILE), "{not json").unwrap();
        assert!(matches!(
            FileBackend::open(dir.path()).await,
            Err(BackendError::Malformed(_))
        ));
    }
}
