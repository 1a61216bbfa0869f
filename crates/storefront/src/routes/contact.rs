//! Contact form route handler.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use velvet_loom_core::{Email, NewContactSubmission};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Submit a contact form message.
///
/// POST /contact
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn submit(
    State(state): State<AppState>,
    Json(mut form): Json<NewContactSubmission>,
) -> Result<StatusCode> {
    form.email = form.email.trim().to_lowercase();
    Email::parse(&form.email)
        .map_err(|_| AppError::BadRequest("Please enter a valid email address.".to_owned()))?;

    if form.name.trim().is_empty() || form.message.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Name and message are required.".to_owned(),
        ));
    }

    state.backend().submit_contact(&form).await?;
    Ok(StatusCode::CREATED)
}
