//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the writes the HTTP layer accepts

pub mod guestbook;
pub mod page;
pub mod rsvp;
