//! Authentication extractor for dashboard handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use invito_core::error::CoreError;

use crate::auth;
use crate::error::AppError;
use crate::state::AppState;

/// The user a dashboard request acts as.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = auth::provider().current_user().ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Not signed in".into()))
        })?;

        Ok(AuthUser {
            user_id: identity.id.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
        })
    }
}
