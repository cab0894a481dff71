use crate::domain::checkout::BillingCycle;
use crate::domain::plan::SubscriptionPlan;
use crate::domain::ports::PricingResolver;
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

/// A thread-safe in-memory catalog of subscription plans.
///
/// Also tracks which users already hold a subscription, since only users
/// without one qualify for first-time pricing.
#[derive(Default, Clone)]
pub struct InMemoryPlanCatalog {
    plans: Arc<RwLock<HashMap<String, SubscriptionPlan>>>,
    subscribers: Arc<RwLock<HashSet<String>>>,
}

impl InMemoryPlanCatalog {
    /// Creates a new, empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn store(&self, plan: SubscriptionPlan) {
        let mut plans = self.plans.write().await;
        plans.insert(plan.slug.clone(), plan);
    }

    pub async fn get(&self, slug: &str) -> Option<SubscriptionPlan> {
        let plans = self.plans.read().await;
        plans.get(slug).cloned()
    }

    pub async fn record_subscriber(&self, user_id: impl Into<String>) {
        let mut subscribers = self.subscribers.write().await;
        subscribers.insert(user_id.into());
    }

    pub async fn is_first_time(&self, user_id: &str) -> bool {
        let subscribers = self.subscribers.read().await;
        !subscribers.contains(user_id)
    }
}

#[async_trait]
impl PricingResolver for InMemoryPlanCatalog {
    async fn price_for(
        &self,
        user_id: &str,
        plan_slug: &str,
        billing_cycle: BillingCycle,
    ) -> Result<Option<Decimal>> {
        let Some(plan) = self.get(plan_slug).await else {
            warn!(plan = plan_slug, "Plan not found");
            return Ok(None);
        };
        let first_time = self.is_first_time(user_id).await;
        Ok(Some(plan.price_for(billing_cycle, first_time)))
    }
}
