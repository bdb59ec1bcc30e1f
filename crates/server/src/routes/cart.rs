use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use models::{Cart, Product, ProductId};
use serde::{Deserialize, Serialize};
use service::cart::{CartStore, UpdateProductAmount};

use crate::errors::JsonApiError;

#[derive(Clone)]
pub struct AppState {
    pub cart: Arc<CartStore>,
}

/// Cart as rendered to clients.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CartView {
    pub items: Vec<Product>,
    /// Distinct products in the cart.
    pub size: usize,
    pub total: f64,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self { items: cart.lines().to_vec(), size: cart.size(), total: cart.total() }
    }
}

#[derive(Debug, Deserialize)]
pub struct AmountBody {
    pub amount: i64,
}

/// Current cart
pub async fn get_cart(State(state): State<AppState>) -> Json<CartView> {
    Json(CartView::from(&*state.cart.cart()))
}

/// Add one unit of a product
pub async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<CartView>, JsonApiError> {
    let cart = state.cart.add_product(id).await?;
    Ok(Json(CartView::from(&*cart)))
}

/// Remove a product's line
pub async fn remove_item(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<CartView>, JsonApiError> {
    let cart = state.cart.remove_product(id).await?;
    Ok(Json(CartView::from(&*cart)))
}

/// Set a line's amount; amounts below 1 leave the cart as it is
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<AmountBody>,
) -> Result<Json<CartView>, JsonApiError> {
    let update = UpdateProductAmount { product_id: id, amount: body.amount };
    let cart = match state.cart.update_product_amount(update).await? {
        Some(cart) => cart,
        None => state.cart.cart(),
    };
    Ok(Json(CartView::from(&*cart)))
}

/// Empty the cart
pub async fn clear_cart(State(state): State<AppState>) -> Result<Json<CartView>, JsonApiError> {
    state
        .cart
        .clear()
        .await
        .map(|cart| Json(CartView::from(&*cart)))
        .map_err(|e| JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(e.to_string())))
}
