use super::checkout::BillingCycle;
use super::gateway::{GatewayResponse, PaymentRequest};
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Url;
use rust_decimal::Decimal;

#[async_trait]
pub trait PricingResolver: Send + Sync {
    /// Rupee price of `plan_slug` for this user, or `None` when no price is known.
    async fn price_for(
        &self,
        user_id: &str,
        plan_slug: &str,
        billing_cycle: BillingCycle,
    ) -> Result<Option<Decimal>>;
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment(&self, request: &PaymentRequest) -> Result<GatewayResponse>;
}

#[async_trait]
pub trait Redirector: Send + Sync {
    async fn navigate(&self, url: &Url) -> Result<()>;
}

pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

pub type PricingResolverBox = Box<dyn PricingResolver>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
pub type RedirectorBox = Box<dyn Redirector>;
pub type ClockBox = Box<dyn Clock>;
