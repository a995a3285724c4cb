use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use invito_core::guestbook::LikeState;
use invito_core::types::DbId;
use tokio::sync::Mutex;

use super::PageStore;
use crate::models::guestbook::{CreateGuestbookEntry, GuestbookEntry, LikeToggle};
use crate::models::page::{CreatePage, Page, SavePageContent, UpdatePageMetadata};
use crate::models::rsvp::{CreateRsvp, Rsvp};
use crate::{StoreError, StoreResult};

#[derive(Debug, Default)]
struct State {
    next_id: DbId,
    pages: Vec<Page>,
    guestbook: Vec<GuestbookEntry>,
    likes: HashSet<(DbId, String)>,
    rsvps: Vec<Rsvp>,
}

impl State {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn ensure_slug_free(&self, slug: &str, except: Option<DbId>) -> StoreResult<()> {
        let taken = self
            .pages
            .iter()
            .any(|p| p.slug == slug && Some(p.id) != except);
        if taken {
            return Err(StoreError::Conflict(format!("Slug '{slug}' is already taken")));
        }
        Ok(())
    }
}

/// In-process [`PageStore`]. Every operation runs under one mutex.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PageStore for MemoryStore {
    async fn health_check(&self) -> bool {
        true
    }

    async fn get_page_by_slug(&self, slug: &str) -> StoreResult<Option<Page>> {
        let state = self.state.lock().await;
        Ok(state.pages.iter().find(|p| p.slug == slug).cloned())
    }

    async fn get_page_by_id(&self, id: DbId) -> StoreResult<Option<Page>> {
        let state = self.state.lock().await;
        Ok(state.pages.iter().find(|p| p.id == id).cloned())
    }

    async fn list_pages(&self) -> StoreResult<Vec<Page>> {
        let state = self.state.lock().await;
        let mut pages = state.pages.clone();
        pages.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(pages)
    }

    async fn create_page(&self, input: &CreatePage) -> StoreResult<Page> {
        let mut state = self.state.lock().await;
        state.ensure_slug_free(&input.slug, None)?;
        let now = Utc::now();
        let page = Page {
            id: state.next_id(),
            slug: input.slug.clone(),
            title: input.title.clone(),
            description: input.description.clone(),
            content: serde_json::json!([]),
            is_published: input.is_published,
            fonts: serde_json::json!([]),
            version: 1,
            created_at: now,
            updated_at: now,
        };
        state.pages.push(page.clone());
        Ok(page)
    }

    async fn update_page_metadata(
        &self,
        id: DbId,
        input: &UpdatePageMetadata,
    ) -> StoreResult<Option<Page>> {
        let mut state = self.state.lock().await;
        state.ensure_slug_free(&input.slug, Some(id))?;
        let Some(page) = state.pages.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        page.title = input.title.clone();
        page.slug = input.slug.clone();
        page.description = input.description.clone();
        page.is_published = input.is_published;
        page.updated_at = Utc::now();
        Ok(Some(page.clone()))
    }

    async fn replace_page_content(
        &self,
        id: DbId,
        input: &SavePageContent,
    ) -> StoreResult<Option<Page>> {
        let mut state = self.state.lock().await;
        let Some(page) = state.pages.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(expected) = input.expected_version {
            if page.version != expected {
                return Err(StoreError::Conflict(format!(
                    "Page {id} has changed since version {expected}"
                )));
            }
        }
        page.content = serde_json::json!(&input.slides);
        page.is_published = input.is_published;
        page.fonts = serde_json::json!(&input.fonts);
        page.version += 1;
        page.updated_at = Utc::now();
        Ok(Some(page.clone()))
    }

    async fn delete_page(&self, id: DbId) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.pages.len();
        state.pages.retain(|p| p.id != id);
        if state.pages.len() == before {
            return Ok(false);
        }

        let entry_ids: HashSet<DbId> = state
            .guestbook
            .iter()
            .filter(|e| e.page_id == id)
            .map(|e| e.id)
            .collect();
        state.guestbook.retain(|e| e.page_id != id);
        state.likes.retain(|(entry, _)| !entry_ids.contains(entry));
        state.rsvps.retain(|r| r.page_id != id);
        Ok(true)
    }

    async fn list_guestbook_entries(&self, page_id: DbId) -> StoreResult<Vec<GuestbookEntry>> {
        let state = self.state.lock().await;
        let mut entries: Vec<_> = state
            .guestbook
            .iter()
            .filter(|e| e.page_id == page_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(entries)
    }

    async fn find_guestbook_entry(&self, id: DbId) -> StoreResult<Option<GuestbookEntry>> {
        let state = self.state.lock().await;
        Ok(state.guestbook.iter().find(|e| e.id == id).cloned())
    }

    async fn create_guestbook_entry(
        &self,
        page_id: DbId,
        input: &CreateGuestbookEntry,
    ) -> StoreResult<GuestbookEntry> {
        let mut state = self.state.lock().await;
        if !state.pages.iter().any(|p| p.id == page_id) {
            return Err(StoreError::NotFound {
                entity: "Page",
                id: page_id.to_string(),
            });
        }
        let entry = GuestbookEntry {
            id: state.next_id(),
            page_id,
            name: input.name.clone(),
            message: input.message.clone(),
            parent_id: input.parent_id,
            likes_count: 0,
            created_at: Utc::now(),
        };
        state.guestbook.push(entry.clone());
        Ok(entry)
    }

    async fn toggle_like(&self, entry_id: DbId, session_id: &str) -> StoreResult<LikeToggle> {
        let mut state = self.state.lock().await;
        let key = (entry_id, session_id.to_string());
        let Some(index) = state.guestbook.iter().position(|e| e.id == entry_id) else {
            return Err(StoreError::NotFound {
                entity: "GuestbookEntry",
                id: entry_id.to_string(),
            });
        };

        let next = if state.likes.remove(&key) {
            LikeState::NotLiked
        } else {
            state.likes.insert(key);
            LikeState::Liked
        };
        let entry = &mut state.guestbook[index];
        entry.likes_count = next.apply_to_count(entry.likes_count);
        Ok(LikeToggle {
            liked: next.is_liked(),
            likes_count: entry.likes_count,
        })
    }

    async fn create_rsvp(&self, page_id: DbId, input: &CreateRsvp) -> StoreResult<Rsvp> {
        let mut state = self.state.lock().await;
        if !state.pages.iter().any(|p| p.id == page_id) {
            return Err(StoreError::NotFound {
                entity: "Page",
                id: page_id.to_string(),
            });
        }
        let rsvp = Rsvp {
            id: state.next_id(),
            page_id,
            name: input.name.clone(),
            message: input.message.clone(),
            status: input.status.as_str().to_string(),
            created_at: Utc::now(),
        };
        state.rsvps.push(rsvp.clone());
        Ok(rsvp)
    }

    async fn list_rsvps(&self, page_id: DbId) -> StoreResult<Vec<Rsvp>> {
        let state = self.state.lock().await;
        let mut rsvps: Vec<_> = state
            .rsvps
            .iter()
            .filter(|r| r.page_id == page_id)
            .cloned()
            .collect();
        rsvps.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rsvps)
    }
}
