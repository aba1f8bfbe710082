//! Records the desk works with. The backend owns them; the UI only holds
//! transient copies for rendering.

mod complaint;
mod user;

pub use complaint::{
    Badge, Category, Complaint, ComplaintEdit, ComplaintFilter, ComplaintId, NewComplaint,
    ParseEnumError, Query, Status, StatusUpdate,
};
pub use user::{Registration, Role, Session, UserId};
