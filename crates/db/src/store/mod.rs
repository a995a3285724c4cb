//! Storage abstraction used by the HTTP layer.
//!
//! [`PageStore`] covers everything a request handler persists or loads.
//! [`PgStore`] backs it with Postgres through the repositories;
//! [`MemoryStore`] keeps everything in process for tests and for running
//! without a database.

use async_trait::async_trait;
use invito_core::types::DbId;

use crate::models::guestbook::{CreateGuestbookEntry, GuestbookEntry, LikeToggle};
use crate::models::page::{CreatePage, Page, SavePageContent, UpdatePageMetadata};
use crate::models::rsvp::{CreateRsvp, Rsvp};
use crate::StoreResult;

mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

/// Persistence operations for pages and their guest interactions.
///
/// Implementations must be `Send + Sync`; one instance is shared by every
/// request through the application state.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Whether the backend is reachable.
    async fn health_check(&self) -> bool;

    async fn get_page_by_slug(&self, slug: &str) -> StoreResult<Option<Page>>;

    async fn get_page_by_id(&self, id: DbId) -> StoreResult<Option<Page>>;

    /// All pages, most recently edited first.
    async fn list_pages(&self) -> StoreResult<Vec<Page>>;

    /// Create a page with empty content at version 1.
    ///
    /// A taken slug is a conflict.
    async fn create_page(&self, input: &CreatePage) -> StoreResult<Page>;

    /// Returns `None` if the page does not exist.
    async fn update_page_metadata(
        &self,
        id: DbId,
        input: &UpdatePageMetadata,
    ) -> StoreResult<Option<Page>>;

    /// Replace content, publish flag and fonts wholesale and bump the
    /// version.
    ///
    /// Returns `None` if the page does not exist, and
    /// [`StoreError::Conflict`](crate::StoreError::Conflict) if
    /// `expected_version` is set and no longer current.
    async fn replace_page_content(
        &self,
        id: DbId,
        input: &SavePageContent,
    ) -> StoreResult<Option<Page>>;

    /// Delete a page with its guestbook entries, likes and RSVPs.
    async fn delete_page(&self, id: DbId) -> StoreResult<bool>;

    /// Entries of a page in ascending `(created_at, id)` order.
    async fn list_guestbook_entries(&self, page_id: DbId) -> StoreResult<Vec<GuestbookEntry>>;

    async fn find_guestbook_entry(&self, id: DbId) -> StoreResult<Option<GuestbookEntry>>;

    async fn create_guestbook_entry(
        &self,
        page_id: DbId,
        input: &CreateGuestbookEntry,
    ) -> StoreResult<GuestbookEntry>;

    /// Like the entry for `session_id` if it does not yet, otherwise remove
    /// the like. The like row and the counter change atomically.
    async fn toggle_like(&self, entry_id: DbId, session_id: &str) -> StoreResult<LikeToggle>;

    async fn create_rsvp(&self, page_id: DbId, input: &CreateRsvp) -> StoreResult<Rsvp>;

    /// RSVPs of a page, newest first.
    async fn list_rsvps(&self, page_id: DbId) -> StoreResult<Vec<Rsvp>>;
}
