//! Guestbook entry model and DTOs.

use invito_core::guestbook::Threaded;
use invito_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `guestbook` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct GuestbookEntry {
    pub id: DbId,
    pub page_id: DbId,
    pub name: String,
    pub message: String,
    pub parent_id: Option<DbId>,
    pub likes_count: i32,
    pub created_at: Timestamp,
}

impl Threaded for GuestbookEntry {
    fn id(&self) -> DbId {
        self.id
    }

    fn parent_id(&self) -> Option<DbId> {
        self.parent_id
    }
}

/// DTO for posting an entry or a reply.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGuestbookEntry {
    pub name: String,
    pub message: String,
    pub parent_id: Option<DbId>,
}

/// Outcome of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeToggle {
    pub liked: bool,
    pub likes_count: i32,
}
