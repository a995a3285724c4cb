//! Repository for the `rsvps` table.

use invito_core::types::DbId;
use sqlx::PgPool;

use crate::models::rsvp::{CreateRsvp, Rsvp};

const COLUMNS: &str = "id, page_id, name, message, status, created_at";

pub struct RsvpRepo;

impl RsvpRepo {
    pub async fn create(
        pool: &PgPool,
        page_id: DbId,
        input: &CreateRsvp,
    ) -> Result<Rsvp, sqlx::Error> {
        let query = format!(
            "INSERT INTO rsvps (page_id, name, message, status)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Rsvp>(&query)
            .bind(page_id)
            .bind(&input.name)
            .bind(&input.message)
            .bind(input.status.as_str())
            .fetch_one(pool)
            .await
    }

    /// RSVPs of a page, newest first.
    pub async fn list_by_page(pool: &PgPool, page_id: DbId) -> Result<Vec<Rsvp>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rsvps WHERE page_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Rsvp>(&query)
            .bind(page_id)
            .fetch_all(pool)
            .await
    }
}
