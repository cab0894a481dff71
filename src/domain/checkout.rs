use crate::error::CheckoutError;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Annual,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Annual => "annual",
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingCycle {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(BillingCycle::Monthly),
            "annual" => Ok(BillingCycle::Annual),
            _ => Err(CheckoutError::InvalidBillingCycle(s.to_string())),
        }
    }
}

/// The signed-in user on whose behalf a checkout is started.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthenticatedUser {
    pub id: String,
}

impl AuthenticatedUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// `None` for an empty or whitespace-only id.
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim();
        (!id.is_empty()).then(|| Self::new(id))
    }
}

/// A single "pay now" click. Lives only until the redirect or the error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub user_id: String,
    pub plan_slug: String,
    pub billing_cycle: BillingCycle,
}

/// Correlates a payment attempt between the application and the gateway.
///
/// Formatted as `{user_id}-{unix_millis}`. Two attempts by the same user in
/// the same millisecond collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerchantTransactionId(String);

impl MerchantTransactionId {
    pub fn generate(user_id: &str, unix_millis: i64) -> Self {
        Self(format!("{}-{}", user_id, unix_millis))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MerchantTransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for MerchantTransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Progress of the checkout flow.
///
/// `Idle -> Submitting -> (Redirecting | Failed)`. Only `Submitting` blocks a
/// new attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckoutState {
    #[default]
    Idle,
    Submitting,
    Redirecting {
        url: Url,
    },
    Failed {
        message: String,
    },
}

impl CheckoutState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, CheckoutState::Submitting)
    }
}
