//! Cart route handlers.
//!
//! The cart lives in the session and is mutated through the pure state
//! machine in `velvet_loom_core::cart`. Refusals (out of stock, stock
//! limit) are advisory: the handler answers 200 with an error toast and
//! the session cart is left exactly as it was. Only transport-level
//! problems (backend unreachable, session store failure) become HTTP
//! errors.

use axum::{
    Json,
    extract::State,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use velvet_loom_core::{Cart, CartLine, CartTotals, ProductId};

use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// One cart line as sent to the client.
#[derive(Debug, Serialize)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub price: rust_decimal::Decimal,
    pub stock: i32,
    pub image: String,
    pub qty: u32,
    pub line_total: rust_decimal::Decimal,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id,
            name: line.product.name.clone(),
            price: line.product.price,
            stock: line.product.stock,
            image: line.product.image.clone(),
            qty: line.qty,
            line_total: line.line_total(),
        }
    }
}

/// Cart contents plus the derived price breakdown.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub totals: CartTotals,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            totals: cart.totals(),
            item_count: cart.total_items(),
        }
    }
}

/// Result of a cart mutation: a toast for the user plus the new state.
#[derive(Debug, Serialize)]
pub struct CartMutationResponse {
    /// `"ok"` for applied mutations, `"error"` for advisory refusals.
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub cart: CartView,
}

impl CartMutationResponse {
    fn ok(message: Option<String>, cart: &Cart) -> Self {
        Self {
            status: "ok",
            message,
            cart: CartView::from(cart),
        }
    }

    fn refused(message: String, cart: &Cart) -> Self {
        Self {
            status: "error",
            message: Some(message),
            cart: CartView::from(cart),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart from the session, defaulting to empty.
pub async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await
        .map_err(|e| AppError::Internal(format!("session read failed: {e}")))?
        .unwrap_or_default())
}

/// Persist the cart back to the session.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session
        .insert(session_keys::CART, cart)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
}

/// Update cart quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    pub qty: u32,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i32,
}

/// Cart badge count payload.
#[derive(Debug, Serialize)]
pub struct CartCountResponse {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Cart contents and totals.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add one unit of a product to the cart.
///
/// The product is fetched fresh from the backend so the stock constraint
/// reflects the latest known inventory.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<AddToCartForm>,
) -> Result<Json<CartMutationResponse>> {
    let product = state
        .backend()
        .get_product(ProductId::new(form.product_id))
        .await?;

    let mut cart = load_cart(&session).await?;
    match cart.add(&product) {
        Ok(()) => {
            save_cart(&session, &cart).await?;
            Ok(Json(CartMutationResponse::ok(
                Some(format!("{} added to cart!", product.name)),
                &cart,
            )))
        }
        Err(refusal) => Ok(Json(CartMutationResponse::refused(
            refusal.to_string(),
            &cart,
        ))),
    }
}

/// Set a line's quantity. Quantity 0 removes the line.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Json(form): Json<UpdateCartForm>,
) -> Result<Json<CartMutationResponse>> {
    let mut cart = load_cart(&session).await?;
    match cart.update_quantity(ProductId::new(form.product_id), form.qty) {
        Ok(()) => {
            save_cart(&session, &cart).await?;
            Ok(Json(CartMutationResponse::ok(None, &cart)))
        }
        Err(refusal) => Ok(Json(CartMutationResponse::refused(
            refusal.to_string(),
            &cart,
        ))),
    }
}

/// Remove a line from the cart. No-op when the product is not in it.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(form): Json<RemoveFromCartForm>,
) -> Result<Json<CartMutationResponse>> {
    let mut cart = load_cart(&session).await?;
    cart.remove(ProductId::new(form.product_id));
    save_cart(&session, &cart).await?;
    Ok(Json(CartMutationResponse::ok(None, &cart)))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartMutationResponse>> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;
    Ok(Json(CartMutationResponse::ok(None, &cart)))
}

/// Cart badge count.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCountResponse>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartCountResponse {
        count: cart.total_items(),
    }))
}
