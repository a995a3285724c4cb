//! Repository for the `guestbook` and `guestbook_likes` tables.

use invito_core::types::DbId;
use sqlx::PgPool;

use crate::models::guestbook::{CreateGuestbookEntry, GuestbookEntry, LikeToggle};

const COLUMNS: &str = "id, page_id, name, message, parent_id, likes_count, created_at";

/// Provides guestbook entries and like toggling.
pub struct GuestbookRepo;

impl GuestbookRepo {
    /// Insert an entry, returning the created row.
    pub async fn create(
        pool: &PgPool,
        page_id: DbId,
        input: &CreateGuestbookEntry,
    ) -> Result<GuestbookEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO guestbook (page_id, name, message, parent_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GuestbookEntry>(&query)
            .bind(page_id)
            .bind(&input.name)
            .bind(&input.message)
            .bind(input.parent_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<GuestbookEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM guestbook WHERE id = $1");
        sqlx::query_as::<_, GuestbookEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All entries of a page, oldest first. Replies are included flat.
    pub async fn list_by_page(
        pool: &PgPool,
        page_id: DbId,
    ) -> Result<Vec<GuestbookEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM guestbook
             WHERE page_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, GuestbookEntry>(&query)
            .bind(page_id)
            .fetch_all(pool)
            .await
    }

    /// Like or unlike an entry on behalf of a session.
    ///
    /// Runs in one transaction holding a row lock on the entry, so the like
    /// row and `likes_count` always move together. Returns `None` if the
    /// entry does not exist.
    pub async fn toggle_like(
        pool: &PgPool,
        entry_id: DbId,
        session_id: &str,
    ) -> Result<Option<LikeToggle>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked = sqlx::query_scalar::<_, DbId>("SELECT id FROM guestbook WHERE id = $1 FOR UPDATE")
            .bind(entry_id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let removed = sqlx::query(
            "DELETE FROM guestbook_likes WHERE guestbook_id = $1 AND session_id = $2",
        )
        .bind(entry_id)
        .bind(session_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        let likes_count = if removed {
            sqlx::query_scalar::<_, i32>(
                "UPDATE guestbook SET likes_count = GREATEST(likes_count - 1, 0)
                 WHERE id = $1 RETURNING likes_count",
            )
            .bind(entry_id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            sqlx::query("INSERT INTO guestbook_likes (guestbook_id, session_id) VALUES ($1, $2)")
                .bind(entry_id)
                .bind(session_id)
                .execute(&mut *tx)
                .await?;
            sqlx::query_scalar::<_, i32>(
                "UPDATE guestbook SET likes_count = likes_count + 1
                 WHERE id = $1 RETURNING likes_count",
            )
            .bind(entry_id)
            .fetch_one(&mut *tx)
            .await?
        };

        tx.commit().await?;
        Ok(Some(LikeToggle {
            liked: !removed,
            likes_count,
        }))
    }
}
