use super::checkout::BillingCycle;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A subscription plan and its rupee prices.
///
/// First-time prices are optional; when absent the regular price applies to
/// new subscribers too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub slug: String,
    pub price_monthly: Decimal,
    pub price_annual: Decimal,
    #[serde(default)]
    pub price_first_time_monthly: Option<Decimal>,
    #[serde(default)]
    pub price_first_time_annual: Option<Decimal>,
}

impl SubscriptionPlan {
    pub fn new(slug: impl Into<String>, price_monthly: Decimal, price_annual: Decimal) -> Self {
        Self {
            slug: slug.into(),
            price_monthly,
            price_annual,
            price_first_time_monthly: None,
            price_first_time_annual: None,
        }
    }

    pub fn with_first_time_prices(
        mut self,
        monthly: Option<Decimal>,
        annual: Option<Decimal>,
    ) -> Self {
        self.price_first_time_monthly = monthly;
        self.price_first_time_annual = annual;
        self
    }

    pub fn regular_price(&self, cycle: BillingCycle) -> Decimal {
        match cycle {
            BillingCycle::Monthly => self.price_monthly,
            BillingCycle::Annual => self.price_annual,
        }
    }

    /// Price for a subscriber, preferring the first-time price for users
    /// who have never subscribed.
    pub fn price_for(&self, cycle: BillingCycle, first_time: bool) -> Decimal {
        let first_time_price = match cycle {
            BillingCycle::Monthly => self.price_first_time_monthly,
            BillingCycle::Annual => self.price_first_time_annual,
        };

        match first_time_price {
            Some(price) if first_time => price,
            _ => self.regular_price(cycle),
        }
    }
}
