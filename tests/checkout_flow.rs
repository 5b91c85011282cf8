//! Integration tests for promo validation and checkout.
//!
//! These tests run against the in-memory promo store and the instant mock
//! gateway, through both the application handlers and the HTTP router.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::json;
use tower::ServiceExt;

use eventsphere::adapters::http::{app_router, CheckoutAppState};
use eventsphere::adapters::{InMemoryPromoRepository, MockPaymentGateway};
use eventsphere::application::{
    CheckoutError, CompleteCheckoutCommand, CompleteCheckoutHandler, PaymentInstrument,
    ValidatePromoCommand, ValidatePromoHandler,
};
use eventsphere::config::ServerConfig;
use eventsphere::domain::foundation::{EventId, Money, Timestamp};
use eventsphere::domain::payment::{PaymentErrorCode, WalletType};
use eventsphere::domain::promo::{Discount, PromoCode, PromoError, Promotion};
use eventsphere::ports::{PaymentGateway, PromoRepository};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn demo_repository() -> Arc<InMemoryPromoRepository> {
    Arc::new(InMemoryPromoRepository::with_demo_codes())
}

fn instant_gateway() -> Arc<dyn PaymentGateway> {
    Arc::new(MockPaymentGateway::instant())
}

fn validate(code: &str, subtotal: u64) -> ValidatePromoCommand {
    ValidatePromoCommand {
        code: code.to_string(),
        event_id: None,
        subtotal: Money::from_major(subtotal),
    }
}

fn visa() -> PaymentInstrument {
    PaymentInstrument::Card {
        number: SecretString::new("4242424242424242".to_string()),
        expiry: "12/99".to_string(),
        cvv: SecretString::new("123".to_string()),
        holder_name: "Asha Rao".to_string(),
        save_card: false,
    }
}

fn capped_promo(code: &str, max_uses: u32) -> Promotion {
    Promotion::new(
        PromoCode::try_new(code).unwrap(),
        Discount::fixed(Money::from_major(25)),
        Timestamp::now().add_days(30),
    )
    .with_max_uses(max_uses)
}

// =============================================================================
// Promo Validation
// =============================================================================

#[tokio::test]
async fn welcome10_discounts_ten_percent_above_minimum() {
    let handler = ValidatePromoHandler::new(demo_repository());

    let validated = handler.handle(validate("welcome10", 200)).await.unwrap();

    assert_eq!(validated.discount_amount, Money::from_major(20));
    assert_eq!(validated.final_amount, Money::from_major(180));
}

#[tokio::test]
async fn welcome10_below_minimum_is_rejected() {
    let handler = ValidatePromoHandler::new(demo_repository());

    let err = handler.handle(validate("WELCOME10", 40)).await.unwrap_err();

    assert!(matches!(
        err,
        PromoError::MinimumNotMet { minimum, .. } if minimum == Money::from_major(50)
    ));
}

#[tokio::test]
async fn save20_is_capped_at_one_hundred() {
    let handler = ValidatePromoHandler::new(demo_repository());

    let validated = handler.handle(validate("SAVE20", 1000)).await.unwrap();

    assert_eq!(validated.discount_amount, Money::from_major(100));
}

#[tokio::test]
async fn fifty_percent_with_cap_of_one_hundred() {
    let repo = Arc::new(InMemoryPromoRepository::new());
    repo.insert(Promotion::new(
        PromoCode::try_new("HALF").unwrap(),
        Discount::percentage(Decimal::from(50))
            .unwrap()
            .with_max_discount(Money::from_major(100)),
        Timestamp::now().add_days(1),
    ))
    .await;

    let validated = ValidatePromoHandler::new(repo)
        .handle(validate("HALF", 1000))
        .await
        .unwrap();

    assert_eq!(validated.discount_amount, Money::from_major(100));
    assert_eq!(validated.final_amount, Money::from_major(900));
}

#[tokio::test]
async fn event_scoped_code_is_hidden_from_other_events() {
    let event = EventId::new();
    let repo = Arc::new(InMemoryPromoRepository::new());
    repo.insert(capped_promo("VIPONLY", 10).for_event(event)).await;
    let handler = ValidatePromoHandler::new(repo);

    let other = handler
        .handle(ValidatePromoCommand {
            event_id: Some(EventId::new()),
            ..validate("VIPONLY", 100)
        })
        .await;
    let same = handler
        .handle(ValidatePromoCommand {
            event_id: Some(event),
            ..validate("VIPONLY", 100)
        })
        .await;

    assert!(matches!(other, Err(PromoError::NotFound { .. })));
    assert!(same.is_ok());
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn checkout_redeems_promo_once() {
    let repo = Arc::new(InMemoryPromoRepository::new());
    let promo = capped_promo("ONCE", 1);
    let promo_id = promo.id;
    repo.insert(promo).await;

    let handler = CompleteCheckoutHandler::new(repo.clone(), instant_gateway());
    let command = || CompleteCheckoutCommand {
        event_id: None,
        subtotal: Money::from_major(100),
        currency: None,
        promo_code: Some("once".to_string()),
        payment: visa(),
    };

    let receipt = handler.handle(command()).await.unwrap();
    assert_eq!(receipt.amount_charged, Money::from_major(75));
    assert_eq!(receipt.payment.amount, Money::from_major(75));

    let stored = repo.find_by_id(&promo_id).await.unwrap().unwrap();
    assert_eq!(stored.used_count, 1);

    let second = handler.handle(command()).await.unwrap_err();
    assert!(matches!(
        second,
        CheckoutError::Promo(PromoError::UsageLimitExceeded { .. })
    ));
}

#[tokio::test]
async fn declined_payment_leaves_promo_unredeemed() {
    let repo = Arc::new(InMemoryPromoRepository::new());
    let promo = capped_promo("KEEP", 1);
    let promo_id = promo.id;
    repo.insert(promo).await;

    let err = CompleteCheckoutHandler::new(repo.clone(), instant_gateway())
        .handle(CompleteCheckoutCommand {
            event_id: None,
            subtotal: Money::from_major(100),
            currency: None,
            promo_code: Some("KEEP".to_string()),
            payment: PaymentInstrument::Card {
                number: SecretString::new("4000000000000002".to_string()),
                expiry: "12/99".to_string(),
                cvv: SecretString::new("123".to_string()),
                holder_name: "Asha Rao".to_string(),
                save_card: false,
            },
        })
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::Payment(e) if e.code == PaymentErrorCode::Declined));
    let stored = repo.find_by_id(&promo_id).await.unwrap().unwrap();
    assert_eq!(stored.used_count, 0);
}

#[tokio::test]
async fn concurrent_checkouts_never_exceed_cap() {
    let repo = Arc::new(InMemoryPromoRepository::new());
    let promo = capped_promo("RUSH", 3);
    let promo_id = promo.id;
    repo.insert(promo).await;

    let handler = Arc::new(CompleteCheckoutHandler::new(repo.clone(), instant_gateway()));
    let tasks: Vec<_> = (0..12)
        .map(|_| {
            let handler = handler.clone();
            tokio::spawn(async move {
                handler
                    .handle(CompleteCheckoutCommand {
                        event_id: None,
                        subtotal: Money::from_major(100),
                        currency: None,
                        promo_code: Some("RUSH".to_string()),
                        payment: PaymentInstrument::Wallet {
                            wallet_type: WalletType::Paytm,
                            wallet_balance: None,
                        },
                    })
                    .await
            })
        })
        .collect();

    let mut succeeded = 0;
    for task in tasks {
        if task.await.unwrap().is_ok() {
            succeeded += 1;
        }
    }

    let stored = repo.find_by_id(&promo_id).await.unwrap().unwrap();
    assert!(stored.used_count <= 3);
    assert_eq!(stored.used_count, succeeded);
}

// =============================================================================
// HTTP
// =============================================================================

#[tokio::test]
async fn http_checkout_with_flat50() {
    let state = CheckoutAppState::new(demo_repository(), instant_gateway());
    let app = app_router(state, &ServerConfig::default());

    let request = Request::builder()
        .method("POST")
        .uri("/api/checkout")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "subtotal": 250,
                "promoCode": "FLAT50",
                "payment": {
                    "method": "card",
                    "number": "5555 5555 5555 4444",
                    "expiry": "12/99",
                    "cvv": "123",
                    "holderName": "Asha Rao"
                }
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["amountCharged"], "200.00");
    assert_eq!(body["payment"]["cardBrand"], "mastercard");
    assert_eq!(body["payment"]["last4"], "4444");
}
