//! Mocked payment handler.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::Result;
use crate::services::payment::{PaymentConfirmation, checkout};
use crate::state::AppState;
use crate::validation::PaymentForm;

#[instrument(skip(state, form))]
pub async fn pay(
    State(state): State<AppState>,
    Json(form): Json<PaymentForm>,
) -> Result<Json<PaymentConfirmation>> {
    let store = state.store().read().await;
    Ok(Json(checkout(&form, store.cart())?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{Value, json};

    use crate::routes::app;
    use crate::routes::test_support::{product_json, send, state};

    fn card() -> Value {
        json!({
            "card_number": "4242 4242 4242 4242",
            "expiry_date": "12/29",
            "cvv": "123",
            "card_holder": "AYŞE YILMAZ"
        })
    }

    #[tokio::test]
    async fn test_payment_with_items() {
        let app = app(state());
        send(&app, Method::POST, "/cart/add", Some(product_json(7, "9.99"))).await;
        send(&app, Method::POST, "/cart/add", Some(product_json(7, "9.99"))).await;

        let (status, body) = send(&app, Method::POST, "/payment", Some(card())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["item_count"], 2);
        assert_eq!(body["message"], "Payment completed");

        // cart is left untouched
        let (_, cart) = send(&app, Method::GET, "/cart", None).await;
        assert_eq!(cart["item_count"], 2);
    }

    #[tokio::test]
    async fn test_payment_with_empty_cart() {
        let app = app(state());
        let (status, body) = send(&app, Method::POST, "/payment", Some(card())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Cart is empty");
    }

    #[tokio::test]
    async fn test_payment_invalid_card() {
        let app = app(state());
        let mut form = card();
        form["expiry_date"] = json!("00/29");
        let (status, body) = send(&app, Method::POST, "/payment", Some(form)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"]["expiry_date"], "Use the MM/YY format");
    }
}
