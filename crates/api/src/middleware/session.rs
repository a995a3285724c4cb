//! Anonymous guest sessions.
//!
//! Guests are told apart by a random id kept in the `guestbook_session`
//! cookie. The id is only used to attribute guestbook likes.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::response::{IntoResponseParts, ResponseParts};
use cookie::time::Duration;
use cookie::{Cookie, SameSite};

pub const SESSION_COOKIE: &str = "guestbook_session";

/// Session id for the requesting guest.
///
/// `is_new` is set when the request carried no session cookie; the handler
/// must then return the session as a response part so the cookie is set.
#[derive(Debug, Clone)]
pub struct GuestSession {
    pub id: String,
    pub is_new: bool,
}

impl GuestSession {
    fn issue() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            is_new: true,
        }
    }

    /// The `Set-Cookie` value that stores this session for a year.
    pub fn cookie(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, self.id.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(Duration::days(365))
            .build()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for GuestSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let existing = parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .find(|c| c.name() == SESSION_COOKIE && !c.value().is_empty())
            .map(|c| c.value().to_string());

        Ok(match existing {
            Some(id) => GuestSession { id, is_new: false },
            None => GuestSession::issue(),
        })
    }
}

impl IntoResponseParts for GuestSession {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if self.is_new {
            if let Ok(value) = HeaderValue::from_str(&self.cookie().to_string()) {
                res.headers_mut().append(SET_COOKIE, value);
            }
        }
        Ok(res)
    }
}
