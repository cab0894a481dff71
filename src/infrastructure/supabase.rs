use crate::domain::gateway::{CREATE_PAYMENT_FUNCTION, GatewayResponse, PaymentRequest};
use crate::domain::ports::PaymentGateway;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use tracing::debug;

/// Connection details of the Supabase project hosting the edge functions.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: Url,
    pub anon_key: String,
}

/// Invokes the `create-phonepe-payment` edge function over HTTP.
pub struct SupabaseFunctionGateway {
    client: reqwest::Client,
    endpoint: Url,
    anon_key: String,
}

impl SupabaseFunctionGateway {
    pub fn new(config: SupabaseConfig) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: function_url(&config.url, CREATE_PAYMENT_FUNCTION)?,
            anon_key: config.anon_key,
        })
    }
}

/// `{base}/functions/v1/{name}`, tolerating a trailing slash on `base`.
pub fn function_url(base: &Url, name: &str) -> Result<Url> {
    let base = base.as_str().trim_end_matches('/');
    Url::parse(&format!("{}/functions/v1/{}", base, name))
        .map_err(|e| CheckoutError::InvalidUrl(e.to_string()))
}

/// Pulls a readable message out of an error body, which is either
/// `{"message": ..}`, `{"error": ..}` or `{"error": {"message": ..}}`.
fn error_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|value| {
        value
            .get("message")
            .and_then(|m| m.as_str())
            .or_else(|| value.get("error").and_then(|e| e.as_str()))
            .or_else(|| {
                value
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
            })
            .map(str::to_string)
    });

    match message {
        Some(message) => message,
        None if !body.trim().is_empty() => format!("HTTP {}: {}", status, body.trim()),
        None => format!("HTTP {}", status),
    }
}

#[async_trait]
impl PaymentGateway for SupabaseFunctionGateway {
    async fn create_payment(&self, request: &PaymentRequest) -> Result<GatewayResponse> {
        debug!(endpoint = %self.endpoint, tx = %request.merchant_transaction_id, "Invoking payment function");

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.anon_key)
            .header("apikey", &self.anon_key)
            .json(request)
            .send()
            .await
            .map_err(|e| CheckoutError::GatewayInvocation(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::GatewayInvocation(e.to_string()))?;

        if !status.is_success() {
            return Err(CheckoutError::GatewayInvocation(error_message(status, &body)));
        }

        serde_json::from_str(&body).map_err(|e| {
            CheckoutError::GatewayInvocation(format!("malformed gateway response: {}", e))
        })
    }
}
