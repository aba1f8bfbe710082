//! Commands: futures that talk to the backend and resolve into [`AppMsg`].

use super::forms::Draft;
use super::msg::{AdminStats, AppMsg, AuthAction, HomeData, Purpose};
use crate::backend::Backend;
use crate::domain::{
    Complaint, ComplaintEdit, ComplaintFilter, ComplaintId, NewComplaint, Query, Registration,
    Session, Status, StatusUpdate, UserId,
};
use crate::error::{BackendResult, DeskError};
use crate::stats::{by_category, StatusCounts};
use crate::upload;
use crate::view::home::RecentItem;
use bubbletea_rs::{Cmd, Msg};
use chrono::Utc;
use tokio::sync::watch;

fn done(msg: AppMsg) -> Option<Msg> {
    Some(Box::new(msg) as Msg)
}

/// Resolves on the next session change.
pub fn watch_session(mut rx: watch::Receiver<Option<Session>>) -> Cmd {
    Box::pin(async move {
        rx.changed().await.ok()?;
        let session = rx.borrow_and_update().clone();
        done(AppMsg::SessionChanged(session))
    })
}

/// Signs in.
pub fn login(backend: Backend, email: String, password: String) -> Cmd {
    Box::pin(async move {
        let result = backend.identity.sign_in(&email, &password).await.map(|_| ());
        done(AppMsg::AuthDone {
            action: AuthAction::Login,
            result,
        })
    })
}

/// Creates an account.
pub fn register(backend: Backend, registration: Registration) -> Cmd {
    Box::pin(async move {
        let result = backend.identity.sign_up(registration).await.map(|_| ());
        done(AppMsg::AuthDone {
            action: AuthAction::Register,
            result,
        })
    })
}

/// Signs out.
pub fn logout(backend: Backend) -> Cmd {
    Box::pin(async move {
        let result = backend.identity.sign_out().await;
        done(AppMsg::AuthDone {
            action: AuthAction::Logout,
            result,
        })
    })
}

async fn home_data(backend: &Backend, owner: UserId, recent: usize) -> BackendResult<HomeData> {
    let repo = &backend.complaints;
    let (mine, newest) = tokio::try_join!(
        repo.list_by_owner(&owner),
        repo.query(Query::owned_by(owner.clone()).limit(recent)),
    )?;
    Ok(HomeData {
        counts: StatusCounts::tally(&mine),
        recent: newest
            .into_iter()
            .map(|c| RecentItem {
                category: c.category,
                status: c.status,
                submitted: c.created_at,
            })
            .collect(),
    })
}

/// Loads quick stats and recent activity of `owner`.
pub fn load_home(backend: Backend, owner: UserId, recent: usize, generation: u64) -> Cmd {
    Box::pin(async move {
        let result = home_data(&backend, owner, recent).await;
        done(AppMsg::HomeLoaded { generation, result })
    })
}

/// Loads `owner`'s complaints for `page`.
pub fn load_mine(backend: Backend, owner: UserId, page: usize, generation: u64) -> Cmd {
    Box::pin(async move {
        let result = backend.complaints.list_by_owner(&owner).await;
        done(AppMsg::MineLoaded {
            generation,
            page,
            result,
        })
    })
}

/// Loads the filtered admin listing for `page`.
pub fn load_admin(backend: Backend, filter: ComplaintFilter, page: usize, generation: u64) -> Cmd {
    Box::pin(async move {
        let result = backend.complaints.list_all(filter).await;
        done(AppMsg::AdminLoaded {
            generation,
            page,
            result,
        })
    })
}

async fn admin_stats(backend: &Backend) -> BackendResult<AdminStats> {
    let repo = &backend.complaints;
    let (all, pending, in_progress, resolved) = tokio::try_join!(
        repo.list_all(ComplaintFilter::default()),
        repo.count(Query::all().with_status(Status::Pending)),
        repo.count(Query::all().with_status(Status::InProgress)),
        repo.count(Query::all().with_status(Status::Resolved)),
    )?;
    Ok(AdminStats {
        counts: StatusCounts {
            total: all.len(),
            pending,
            in_progress,
            resolved,
        },
        by_category: by_category(&all),
    })
}

/// Loads the admin stat cards and charts.
pub fn load_stats(backend: Backend, generation: u64) -> Cmd {
    Box::pin(async move {
        let result = admin_stats(&backend).await;
        done(AppMsg::StatsLoaded { generation, result })
    })
}

/// Fetches one record.
pub fn fetch(backend: Backend, id: ComplaintId, purpose: Purpose) -> Cmd {
    Box::pin(async move {
        let result = backend.complaints.get(&id).await;
        done(AppMsg::Fetched {
            purpose,
            id,
            result,
        })
    })
}

/// Inspects an image path for the form preview.
pub fn attach(path: String, limit: u64) -> Cmd {
    Box::pin(async move { done(AppMsg::Attached(upload::inspect(&path, limit).await)) })
}

// Validates and uploads the image, then writes the record. Nothing reaches
// the backend until the image has passed both size checks.
async fn store(
    backend: &Backend,
    owner: &Session,
    draft: Draft,
    limit: u64,
) -> Result<Complaint, DeskError> {
    let attachment = match draft.pending_path {
        Some(path) => Some(upload::inspect(&path, limit).await?),
        None => draft.attachment,
    };
    let image_url = match attachment {
        Some(a) => {
            let bytes = upload::read(&a, limit).await?;
            let path = upload::blob_path(&owner.user_id, Utc::now(), &a.file_name);
            Some(backend.blobs.upload(&path, bytes).await?)
        }
        None => draft.keep_image,
    };
    let complaint = match draft.editing {
        Some(id) => {
            let edit = ComplaintEdit {
                category: draft.category,
                description: draft.description,
                image_url,
            };
            backend.complaints.update_details(&id, edit).await?
        }
        None => {
            let new = NewComplaint {
                submitter_id: owner.user_id.clone(),
                submitter_email: owner.email.clone(),
                category: draft.category,
                description: draft.description,
                image_url,
            };
            backend.complaints.create(new).await?
        }
    };
    Ok(complaint)
}

/// Stores the complaint form.
pub fn save(backend: Backend, owner: Session, draft: Draft, limit: u64) -> Cmd {
    Box::pin(async move {
        let edited = draft.editing.is_some();
        let result = store(&backend, &owner, draft, limit).await;
        done(AppMsg::Saved { edited, result })
    })
}

/// Deletes a record.
pub fn delete(backend: Backend, id: ComplaintId) -> Cmd {
    Box::pin(async move { done(AppMsg::Deleted(backend.complaints.delete(&id).await)) })
}

/// Writes an admin status update.
pub fn update_status(backend: Backend, id: ComplaintId, update: StatusUpdate) -> Cmd {
    Box::pin(async move {
        done(AppMsg::StatusSaved(
            backend.complaints.update_status(&id, update).await,
        ))
    })
}
