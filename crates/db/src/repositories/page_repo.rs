//! Repository for the `pages` table.

use invito_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::page::{CreatePage, Page, SavePageContent, UpdatePageMetadata};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, slug, title, description, content, is_published, fonts, version, \
                       created_at, updated_at";

/// Provides CRUD operations for pages.
pub struct PageRepo;

impl PageRepo {
    /// Insert a new page with empty content, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePage) -> Result<Page, sqlx::Error> {
        let query = format!(
            "INSERT INTO pages (slug, title, description, is_published)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(&input.slug)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.is_published)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE slug = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List all pages, most recently edited first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages ORDER BY updated_at DESC, id DESC");
        sqlx::query_as::<_, Page>(&query).fetch_all(pool).await
    }

    /// Update title, slug, description and publish flag.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_metadata(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePageMetadata,
    ) -> Result<Option<Page>, sqlx::Error> {
        let query = format!(
            "UPDATE pages SET
                title = $2,
                slug = $3,
                description = $4,
                is_published = $5,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(input.is_published)
            .fetch_optional(pool)
            .await
    }

    /// Replace content, publish flag and fonts in a single UPDATE and bump
    /// the version.
    ///
    /// When `expected_version` is set the row only matches at that version.
    /// Returns `None` if nothing matched.
    pub async fn replace_content(
        pool: &PgPool,
        id: DbId,
        input: &SavePageContent,
    ) -> Result<Option<Page>, sqlx::Error> {
        let query = format!(
            "UPDATE pages SET
                content = $2,
                is_published = $3,
                fonts = $4,
                version = version + 1,
                updated_at = NOW()
             WHERE id = $1 AND ($5::BIGINT IS NULL OR version = $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .bind(Json(&input.slides))
            .bind(input.is_published)
            .bind(Json(&input.fonts))
            .bind(input.expected_version)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM pages WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Delete a page and, through cascades, its guestbook, likes and RSVPs.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
