use super::checkout::MerchantTransactionId;
use super::money::Paise;
use serde::{Deserialize, Serialize};

/// Name of the backend function that creates a PhonePe payment.
pub const CREATE_PAYMENT_FUNCTION: &str = "create-phonepe-payment";

/// Body sent to the payment-creation function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: Paise,
    pub merchant_transaction_id: MerchantTransactionId,
    pub redirect_url: String,
}

/// Response of the payment-creation function.
///
/// Every level is optional: the gateway may answer with a partial body and the
/// caller decides what a missing redirect means.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GatewayResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<GatewayData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayData {
    #[serde(default)]
    pub merchant_id: Option<String>,
    #[serde(default)]
    pub merchant_transaction_id: Option<String>,
    #[serde(default)]
    pub instrument_response: Option<InstrumentResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentResponse {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub redirect_info: Option<RedirectInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RedirectInfo {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
}

impl GatewayResponse {
    /// Builds a response carrying only a hosted-page URL.
    pub fn with_redirect(url: impl Into<String>) -> Self {
        Self {
            success: Some(true),
            code: Some("PAYMENT_INITIATED".to_string()),
            message: None,
            data: Some(GatewayData {
                merchant_id: None,
                merchant_transaction_id: None,
                instrument_response: Some(InstrumentResponse {
                    kind: Some("PAY_PAGE".to_string()),
                    redirect_info: Some(RedirectInfo {
                        url: Some(url.into()),
                        method: Some("GET".to_string()),
                    }),
                }),
            }),
        }
    }

    /// The nested `data.instrumentResponse.redirectInfo.url`, if present and non-empty.
    pub fn redirect_url(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .instrument_response
            .as_ref()?
            .redirect_info
            .as_ref()?
            .url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }
}
