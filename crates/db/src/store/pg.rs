use async_trait::async_trait;
use invito_core::types::DbId;

use super::PageStore;
use crate::models::guestbook::{CreateGuestbookEntry, GuestbookEntry, LikeToggle};
use crate::models::page::{CreatePage, Page, SavePageContent, UpdatePageMetadata};
use crate::models::rsvp::{CreateRsvp, Rsvp};
use crate::repositories::{GuestbookRepo, PageRepo, RsvpRepo};
use crate::{DbPool, StoreError, StoreResult};

/// [`PageStore`] over a Postgres pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl PageStore for PgStore {
    async fn health_check(&self) -> bool {
        crate::health_check(&self.pool).await.is_ok()
    }

    async fn get_page_by_slug(&self, slug: &str) -> StoreResult<Option<Page>> {
        Ok(PageRepo::find_by_slug(&self.pool, slug).await?)
    }

    async fn get_page_by_id(&self, id: DbId) -> StoreResult<Option<Page>> {
        Ok(PageRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_pages(&self) -> StoreResult<Vec<Page>> {
        Ok(PageRepo::list(&self.pool).await?)
    }

    async fn create_page(&self, input: &CreatePage) -> StoreResult<Page> {
        Ok(PageRepo::create(&self.pool, input).await?)
    }

    async fn update_page_metadata(
        &self,
        id: DbId,
        input: &UpdatePageMetadata,
    ) -> StoreResult<Option<Page>> {
        Ok(PageRepo::update_metadata(&self.pool, id, input).await?)
    }

    async fn replace_page_content(
        &self,
        id: DbId,
        input: &SavePageContent,
    ) -> StoreResult<Option<Page>> {
        if let Some(page) = PageRepo::replace_content(&self.pool, id, input).await? {
            return Ok(Some(page));
        }
        match input.expected_version {
            Some(expected) if PageRepo::exists(&self.pool, id).await? => {
                Err(StoreError::Conflict(format!(
                    "Page {id} has changed since version {expected}"
                )))
            }
            _ => Ok(None),
        }
    }

    async fn delete_page(&self, id: DbId) -> StoreResult<bool> {
        Ok(PageRepo::delete(&self.pool, id).await?)
    }

    async fn list_guestbook_entries(&self, page_id: DbId) -> StoreResult<Vec<GuestbookEntry>> {
        Ok(GuestbookRepo::list_by_page(&self.pool, page_id).await?)
    }

    async fn find_guestbook_entry(&self, id: DbId) -> StoreResult<Option<GuestbookEntry>> {
        Ok(GuestbookRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create_guestbook_entry(
        &self,
        page_id: DbId,
        input: &CreateGuestbookEntry,
    ) -> StoreResult<GuestbookEntry> {
        Ok(GuestbookRepo::create(&self.pool, page_id, input).await?)
    }

    async fn toggle_like(&self, entry_id: DbId, session_id: &str) -> StoreResult<LikeToggle> {
        GuestbookRepo::toggle_like(&self.pool, entry_id, session_id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                entity: "GuestbookEntry",
                id: entry_id.to_string(),
            })
    }

    async fn create_rsvp(&self, page_id: DbId, input: &CreateRsvp) -> StoreResult<Rsvp> {
        Ok(RsvpRepo::create(&self.pool, page_id, input).await?)
    }

    async fn list_rsvps(&self, page_id: DbId) -> StoreResult<Vec<Rsvp>> {
        Ok(RsvpRepo::list_by_page(&self.pool, page_id).await?)
    }
}
