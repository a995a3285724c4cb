//! Handlers for RSVPs.

use axum::extract::{FromRequest, Path, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use invito_core::rsvp::validate_rsvp;
use invito_core::types::DbId;
use invito_db::models::rsvp::{CreateRsvp, Rsvp};

use crate::error::AppResult;
use crate::handlers::pages::{ensure_page_exists, ensure_page_published};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// An RSVP body, either JSON from a script or a urlencoded post from the
/// rendered form.
pub struct RsvpSubmission {
    input: CreateRsvp,
    from_form: bool,
}

impl<S> FromRequest<S> for RsvpSubmission
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(input) = Form::<CreateRsvp>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self {
                input,
                from_form: true,
            })
        } else {
            let Json(input) = Json::<CreateRsvp>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self {
                input,
                from_form: false,
            })
        }
    }
}

/// GET /api/v1/pages/{id}/rsvps
///
/// Newest first.
pub async fn list_rsvps(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Rsvp>>>> {
    ensure_page_exists(&state, page_id).await?;
    let rsvps = state.store.list_rsvps(page_id).await?;
    Ok(Json(DataResponse { data: rsvps }))
}

/// POST /api/v1/pages/{id}/rsvps
///
/// Submitted by guests on a published page. A JSON body gets the stored
/// RSVP back with 201; a form post is redirected back to the page.
pub async fn create_rsvp(
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
    submission: RsvpSubmission,
) -> AppResult<Response> {
    let RsvpSubmission { input, from_form } = submission;
    let (name, message) = validate_rsvp(&input.name, input.message.as_deref())?;
    let page = ensure_page_published(&state, page_id).await?;

    let rsvp = state
        .store
        .create_rsvp(
            page_id,
            &CreateRsvp {
                name,
                message,
                status: input.status,
            },
        )
        .await?;

    tracing::info!(page_id, rsvp_id = rsvp.id, status = %input.status, from_form, "RSVP received");

    if from_form {
        return Ok(Redirect::to(&format!("/{}", page.slug)).into_response());
    }
    Ok((StatusCode::CREATED, Json(DataResponse { data: rsvp })).into_response())
}
