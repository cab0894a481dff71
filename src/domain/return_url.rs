use super::checkout::{BillingCycle, MerchantTransactionId};
use crate::error::{CheckoutError, Result};
use reqwest::Url;

/// Path the gateway sends the user back to after payment.
pub const RETURN_PATH: &str = "/payment/phonepe/success";

/// What the application needs to reconcile a payment once the gateway
/// redirects the user back: `?tx={id}&plan={slug}&cycle={cycle}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReturn {
    pub transaction_id: MerchantTransactionId,
    pub plan_slug: String,
    pub billing_cycle: BillingCycle,
}

impl PaymentReturn {
    pub fn new(
        transaction_id: MerchantTransactionId,
        plan_slug: impl Into<String>,
        billing_cycle: BillingCycle,
    ) -> Self {
        Self {
            transaction_id,
            plan_slug: plan_slug.into(),
            billing_cycle,
        }
    }

    /// Builds the return URL under `app_origin`. Query values are percent-encoded.
    pub fn to_url(&self, app_origin: &Url) -> Result<Url> {
        let mut url = app_origin
            .join(RETURN_PATH)
            .map_err(|e| CheckoutError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .clear()
            .append_pair("tx", self.transaction_id.as_str())
            .append_pair("plan", &self.plan_slug)
            .append_pair("cycle", self.billing_cycle.as_str());
        Ok(url)
    }

    pub fn parse(url: &Url) -> Result<Self> {
        if url.path() != RETURN_PATH {
            return Err(CheckoutError::InvalidReturnUrl(format!(
                "unexpected path {}",
                url.path()
            )));
        }

        let mut tx = None;
        let mut plan = None;
        let mut cycle = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "tx" => tx = Some(value.into_owned()),
                "plan" => plan = Some(value.into_owned()),
                "cycle" => cycle = Some(value.into_owned()),
                _ => {}
            }
        }

        let required = |value: Option<String>, name: &str| {
            value
                .filter(|v| !v.is_empty())
                .ok_or_else(|| CheckoutError::InvalidReturnUrl(format!("missing `{}`", name)))
        };

        let transaction_id = MerchantTransactionId::from(required(tx, "tx")?);
        let plan_slug = required(plan, "plan")?;
        let billing_cycle = required(cycle, "cycle")?
            .parse::<BillingCycle>()
            .map_err(|e| CheckoutError::InvalidReturnUrl(e.to_string()))?;

        Ok(Self {
            transaction_id,
            plan_slug,
            billing_cycle,
        })
    }
}
