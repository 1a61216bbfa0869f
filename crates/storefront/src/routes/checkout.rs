//! Checkout route handler.
//!
//! Builds the order draft from the session cart, submits it to the
//! backend, and clears the cart on success. A per-session guard rejects a
//! second submission while one is still in flight; the browser original
//! had no such guard and could double-submit.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use velvet_loom_core::CheckoutRequest;

use crate::error::{AppError, Result};
use crate::middleware::{RequireAuth, clear_current_user};
use crate::routes::cart::{load_cart, save_cart};
use crate::state::AppState;

/// Billing details supplied by the shopper.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
}

/// Successful checkout payload.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order_uid: String,
    pub total: rust_decimal::Decimal,
}

/// Place the order.
///
/// Requires a logged-in user. The backend re-validates stock and rejects
/// the whole order if any item no longer has enough units; in that case
/// the session cart is kept so the shopper can adjust it.
#[instrument(skip(state, session, user, form), fields(user_id = %user.id))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Json(form): Json<CheckoutForm>,
) -> Result<Json<CheckoutResponse>> {
    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest(
            "Your cart is empty. Add some products before checking out.".to_owned(),
        ));
    }

    if form.customer_name.trim().is_empty()
        || form.customer_phone.trim().is_empty()
        || form.customer_address.trim().is_empty()
    {
        return Err(AppError::BadRequest(
            "Name, phone, and address are required.".to_owned(),
        ));
    }

    // Double-submit guard: one pending submission per session. Held in
    // process rather than in the session record, which is only written
    // back to the store after the response completes and so would not be
    // seen by a concurrent request.
    let _guard = match session.id() {
        Some(session_id) => match state.begin_checkout(session_id) {
            Some(guard) => Some(guard),
            None => {
                return Err(AppError::BadRequest(
                    "Your order is already being placed.".to_owned(),
                ));
            }
        },
        // No session id means no cookie has been issued yet, so no other
        // request can share this session.
        None => None,
    };

    let request = CheckoutRequest {
        user_id: user.id,
        items: cart.checkout_items(),
        customer_name: form.customer_name,
        customer_phone: form.customer_phone,
        customer_address: form.customer_address,
    };

    let result = state.backend().checkout(&request, &user.access_token).await;

    let receipt = match result {
        Ok(receipt) => receipt,
        Err(err) => {
            if matches!(err, crate::backend::BackendError::Unauthorized) {
                // Token went stale mid-session: global session reset.
                let _ = clear_current_user(&session).await;
            }
            return Err(err.into());
        }
    };

    // Order placed: the cart's lifecycle ends here.
    let mut cart = cart;
    cart.clear();
    save_cart(&session, &cart).await?;

    tracing::info!(order_uid = %receipt.order_uid, "Order placed");

    Ok(Json(CheckoutResponse {
        order_uid: receipt.order_uid,
        total: receipt.total,
    }))
}
