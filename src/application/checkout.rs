use crate::domain::checkout::{
    AuthenticatedUser, BillingCycle, CheckoutRequest, CheckoutState, MerchantTransactionId,
};
use crate::domain::gateway::PaymentRequest;
use crate::domain::money::Paise;
use crate::domain::ports::{ClockBox, PaymentGatewayBox, PricingResolverBox, RedirectorBox};
use crate::domain::return_url::PaymentReturn;
use crate::error::{CheckoutError, Result};
use reqwest::Url;
use rust_decimal::Decimal;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{error, info, warn};

/// Receives the display message of every failed attempt.
pub type ErrorCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Starts a hosted payment session and sends the user to it.
///
/// `CheckoutInitiator` owns the ports it needs and the state of the current
/// attempt. Pricing and gateway calls are awaited one after the other, since
/// the gateway needs the resolved amount.
pub struct CheckoutInitiator {
    pricing: PricingResolverBox,
    gateway: PaymentGatewayBox,
    redirector: RedirectorBox,
    clock: ClockBox,
    app_origin: Url,
    on_error: Option<ErrorCallback>,
    state: Mutex<CheckoutState>,
}

/// Holds the `Submitting` slot for one attempt.
///
/// Dropping it without `finish` (the attempt future was cancelled) puts the
/// initiator back to `Idle`.
struct SubmitGuard<'a> {
    state: &'a Mutex<CheckoutState>,
    finished: bool,
}

impl SubmitGuard<'_> {
    fn finish(mut self, next: CheckoutState) {
        *lock(self.state) = next;
        self.finished = true;
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut state = lock(self.state);
        if state.is_submitting() {
            warn!("Checkout attempt abandoned before completing");
            *state = CheckoutState::Idle;
        }
    }
}

fn lock(state: &Mutex<CheckoutState>) -> MutexGuard<'_, CheckoutState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CheckoutInitiator {
    /// Creates a new `CheckoutInitiator` in the `Idle` state.
    ///
    /// # Arguments
    ///
    /// * `pricing` - Resolves the plan price for a user.
    /// * `gateway` - Creates the payment session.
    /// * `redirector` - Sends the user to the hosted payment page.
    /// * `clock` - Source of the timestamp embedded in transaction ids.
    /// * `app_origin` - Origin the gateway redirects back to.
    pub fn new(
        pricing: PricingResolverBox,
        gateway: PaymentGatewayBox,
        redirector: RedirectorBox,
        clock: ClockBox,
        app_origin: Url,
    ) -> Self {
        Self {
            pricing,
            gateway,
            redirector,
            clock,
            app_origin,
            on_error: None,
            state: Mutex::new(CheckoutState::Idle),
        }
    }

    /// Registers the callback that receives the message of each failure.
    pub fn with_error_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> CheckoutState {
        lock(&self.state).clone()
    }

    pub fn is_submitting(&self) -> bool {
        lock(&self.state).is_submitting()
    }

    /// Runs one checkout attempt and returns the hosted payment page URL the
    /// user was sent to.
    ///
    /// Every failure is reported through the error callback and leaves the
    /// initiator ready for another attempt. A call made while another attempt
    /// is still submitting fails with `AlreadySubmitting` and leaves that
    /// attempt untouched. Dropping the returned future mid-flight releases the
    /// submit slot without reporting an error.
    pub async fn initiate(
        &self,
        user: Option<&AuthenticatedUser>,
        plan_slug: &str,
        billing_cycle: BillingCycle,
    ) -> Result<Url> {
        let guard = match self.begin() {
            Ok(guard) => guard,
            Err(err) => {
                self.report(&err);
                return Err(err);
            }
        };

        match self.attempt(user, plan_slug, billing_cycle).await {
            Ok(url) => {
                guard.finish(CheckoutState::Redirecting { url: url.clone() });
                Ok(url)
            }
            Err(err) => {
                error!(plan = plan_slug, cycle = %billing_cycle, "Checkout failed: {}", err);
                self.report(&err);
                guard.finish(CheckoutState::Failed {
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn begin(&self) -> Result<SubmitGuard<'_>> {
        let mut state = lock(&self.state);
        if state.is_submitting() {
            return Err(CheckoutError::AlreadySubmitting);
        }
        *state = CheckoutState::Submitting;
        Ok(SubmitGuard {
            state: &self.state,
            finished: false,
        })
    }

    async fn attempt(
        &self,
        user: Option<&AuthenticatedUser>,
        plan_slug: &str,
        billing_cycle: BillingCycle,
    ) -> Result<Url> {
        let user = user
            .filter(|user| !user.id.trim().is_empty())
            .ok_or(CheckoutError::Unauthenticated)?;
        let request = CheckoutRequest {
            user_id: user.id.clone(),
            plan_slug: plan_slug.to_string(),
            billing_cycle,
        };

        let transaction_id =
            MerchantTransactionId::generate(&request.user_id, self.clock.now_millis());

        let price = self
            .pricing
            .price_for(&request.user_id, &request.plan_slug, request.billing_cycle)
            .await
            .map_err(|e| match e {
                CheckoutError::Pricing(_) => e,
                other => CheckoutError::Pricing(other.to_string()),
            })?
            .unwrap_or_else(|| {
                warn!(
                    plan = %request.plan_slug,
                    cycle = %request.billing_cycle,
                    "No price found for plan, charging zero"
                );
                Decimal::ZERO
            });
        let amount = Paise::from_rupees(price)?;

        let redirect_url = PaymentReturn::new(
            transaction_id.clone(),
            request.plan_slug.clone(),
            request.billing_cycle,
        )
        .to_url(&self.app_origin)?;

        info!(
            tx = %transaction_id,
            amount = amount.value(),
            "Creating PhonePe payment"
        );
        let response = self
            .gateway
            .create_payment(&PaymentRequest {
                amount,
                merchant_transaction_id: transaction_id,
                redirect_url: redirect_url.to_string(),
            })
            .await?;

        if response.success == Some(false) {
            return Err(CheckoutError::GatewayInvocation(
                response
                    .message
                    .unwrap_or_else(|| "Payment initiation failed".to_string()),
            ));
        }

        let target = response
            .redirect_url()
            .ok_or(CheckoutError::MissingRedirectUrl)?;
        let target = Url::parse(target).map_err(|e| {
            CheckoutError::GatewayInvocation(format!("invalid redirect URL `{}`: {}", target, e))
        })?;

        info!(url = %target, "Redirecting to PhonePe payment page");
        self.redirector.navigate(&target).await?;
        Ok(target)
    }

    fn report(&self, err: &CheckoutError) {
        if let Some(callback) = &self.on_error {
            callback(&err.to_string());
        }
    }
}
