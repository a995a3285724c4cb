//! Domain core for the invitation page builder.
//!
//! Everything in this crate is synchronous and free of I/O: the element
//! tree and its mutation engine, slides and the editor aggregate, the HTML
//! renderer, guestbook threading, and the validation rules shared by the
//! persistence and HTTP layers.

pub mod editor;
pub mod element;
pub mod error;
pub mod guestbook;
pub mod page;
pub mod props;
pub mod render;
pub mod rsvp;
pub mod slide;
pub mod tree;
pub mod types;
pub mod upload;
