//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod guestbook_repo;
pub mod page_repo;
pub mod rsvp_repo;

pub use guestbook_repo::GuestbookRepo;
pub use page_repo::PageRepo;
pub use rsvp_repo::RsvpRepo;
