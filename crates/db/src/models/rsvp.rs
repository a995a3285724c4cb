//! RSVP model and DTOs.

use invito_core::rsvp::RsvpStatus;
use invito_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `rsvps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rsvp {
    pub id: DbId,
    pub page_id: DbId,
    pub name: String,
    pub message: Option<String>,
    /// One of `attending`, `not_attending`, `maybe` (CHECK constraint).
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for an RSVP submission.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRsvp {
    pub name: String,
    pub message: Option<String>,
    pub status: RsvpStatus,
}
