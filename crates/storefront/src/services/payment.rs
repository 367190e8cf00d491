//! Mocked payment.
//!
//! Validates the card form and summarises the cart. Nothing is charged and
//! the cart is left as it was.

use serde::Serialize;

use pazar_core::Price;

use crate::error::AppError;
use crate::store::Cart;
use crate::validation::PaymentForm;

const CONFIRMATION_MESSAGE: &str = "Payment completed";

/// What the customer sees after a successful payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentConfirmation {
    pub total: Price,
    pub item_count: u64,
    pub message: String,
}

/// Validate `form` and confirm payment for `cart`.
///
/// # Errors
///
/// Returns `AppError::Validation` when a card field is invalid and
/// `AppError::BadRequest` when the cart is empty.
pub fn checkout(form: &PaymentForm, cart: &Cart) -> Result<PaymentConfirmation, AppError> {
    form.validate()?;

    if cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_string()));
    }

    let confirmation = PaymentConfirmation {
        total: cart.total(),
        item_count: cart.item_count(),
        message: CONFIRMATION_MESSAGE.to_string(),
    };
    tracing::info!(
        total = %confirmation.total,
        items = confirmation.item_count,
        "Mock payment accepted"
    );
    Ok(confirmation)
}
