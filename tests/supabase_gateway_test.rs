mod common;

use axum::http::StatusCode;
use common::spawn_payment_function;
use phonepe_checkout::domain::checkout::MerchantTransactionId;
use phonepe_checkout::domain::gateway::PaymentRequest;
use phonepe_checkout::domain::money::Paise;
use phonepe_checkout::domain::ports::PaymentGateway;
use phonepe_checkout::error::CheckoutError;
use phonepe_checkout::infrastructure::supabase::{SupabaseConfig, SupabaseFunctionGateway};
use serde_json::json;

fn request() -> PaymentRequest {
    PaymentRequest {
        amount: Paise::new(49900),
        merchant_transaction_id: MerchantTransactionId::generate("u1", 1_700_000_000_000),
        redirect_url: "http://localhost:8080/payment/phonepe/success?tx=u1-1700000000000&plan=basic&cycle=monthly"
            .to_string(),
    }
}

fn gateway(url: reqwest::Url) -> SupabaseFunctionGateway {
    SupabaseFunctionGateway::new(SupabaseConfig {
        url,
        anon_key: "anon-key".to_string(),
    })
    .unwrap()
}

#[tokio::test]
async fn test_invokes_function_with_payment_body() {
    let reply = json!({
        "success": true,
        "code": "PAYMENT_INITIATED",
        "data": {
            "merchantId": "M1",
            "merchantTransactionId": "u1-1700000000000",
            "instrumentResponse": {
                "type": "PAY_PAGE",
                "redirectInfo": { "url": "https://mercury-uat.phonepe.com/transact/pg?token=abc", "method": "GET" }
            }
        }
    });
    let (base, calls) = spawn_payment_function(StatusCode::OK, reply).await;

    let response = gateway(base).create_payment(&request()).await.unwrap();

    assert_eq!(
        response.redirect_url(),
        Some("https://mercury-uat.phonepe.com/transact/pg?token=abc")
    );

    let calls = calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].authorization.as_deref(), Some("Bearer anon-key"));
    assert_eq!(calls[0].apikey.as_deref(), Some("anon-key"));
    assert_eq!(
        calls[0].body,
        json!({
            "amount": 49900,
            "merchantTransactionId": "u1-1700000000000",
            "redirectUrl": "http://localhost:8080/payment/phonepe/success?tx=u1-1700000000000&plan=basic&cycle=monthly"
        })
    );
}

#[tokio::test]
async fn test_error_status_passes_message_through() {
    let (base, _) = spawn_payment_function(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "message": "PhonePe credentials missing" }),
    )
    .await;

    let err = gateway(base).create_payment(&request()).await.unwrap_err();

    assert!(
        matches!(err, CheckoutError::GatewayInvocation(ref m) if m == "PhonePe credentials missing"),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn test_unreachable_function_is_gateway_error() {
    // Bind and drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = reqwest::Url::parse(&format!("http://{}", addr)).unwrap();
    let err = gateway(base).create_payment(&request()).await.unwrap_err();

    assert!(matches!(err, CheckoutError::GatewayInvocation(_)));
}

#[tokio::test]
async fn test_success_without_redirect_is_not_an_http_error() {
    let (base, _) = spawn_payment_function(StatusCode::OK, json!({ "success": true })).await;

    let response = gateway(base).create_payment(&request()).await.unwrap();

    assert_eq!(response.success, Some(true));
    assert_eq!(response.redirect_url(), None);
}
