pub mod guestbook;
pub mod pages;
pub mod public;
pub mod rsvp;
pub mod upload;
