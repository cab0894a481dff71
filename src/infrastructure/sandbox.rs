use crate::domain::gateway::{GatewayResponse, PaymentRequest};
use crate::domain::ports::PaymentGateway;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

pub const SANDBOX_PAY_URL: &str = "https://api-preprod.phonepe.com/apis/pg-sandbox/pg/v1/pay";
pub const SANDBOX_MERCHANT_ID: &str = "PGTESTPAYUAT";

/// Offline stand-in for the payment-creation function.
///
/// Points the user at the PhonePe sandbox pay page with the payment details
/// in the query string instead of calling any backend.
#[derive(Debug, Clone)]
pub struct SandboxGateway {
    pay_url: Url,
    merchant_id: String,
    callback_url: Option<Url>,
}

impl SandboxGateway {
    pub fn new(pay_url: Url, merchant_id: impl Into<String>) -> Self {
        Self {
            pay_url,
            merchant_id: merchant_id.into(),
            callback_url: None,
        }
    }

    /// Uses the public PhonePe UAT merchant.
    pub fn phonepe_uat() -> Result<Self> {
        let pay_url =
            Url::parse(SANDBOX_PAY_URL).map_err(|e| CheckoutError::InvalidUrl(e.to_string()))?;
        Ok(Self::new(pay_url, SANDBOX_MERCHANT_ID))
    }

    pub fn with_callback_url(mut self, callback_url: Url) -> Self {
        self.callback_url = Some(callback_url);
        self
    }

    fn pay_page_url(&self, request: &PaymentRequest) -> Url {
        let mut url = self.pay_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("merchantId", &self.merchant_id)
                .append_pair(
                    "merchantTransactionId",
                    request.merchant_transaction_id.as_str(),
                )
                .append_pair("amount", &request.amount.to_string())
                .append_pair("redirectUrl", &request.redirect_url);
            if let Some(callback_url) = &self.callback_url {
                query.append_pair("callbackUrl", callback_url.as_str());
            }
        }
        url
    }
}

#[async_trait]
impl PaymentGateway for SandboxGateway {
    async fn create_payment(&self, request: &PaymentRequest) -> Result<GatewayResponse> {
        let url = self.pay_page_url(request);
        debug!(url = %url, "Built sandbox pay page URL");

        let mut response = GatewayResponse::with_redirect(url.to_string());
        if let Some(data) = response.data.as_mut() {
            data.merchant_id = Some(self.merchant_id.clone());
            data.merchant_transaction_id =
                Some(request.merchant_transaction_id.as_str().to_string());
        }
        Ok(response)
    }
}
