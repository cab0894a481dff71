#![allow(dead_code)]

use async_trait::async_trait;
use phonepe_checkout::application::checkout::CheckoutInitiator;
use phonepe_checkout::domain::checkout::BillingCycle;
use phonepe_checkout::domain::gateway::{GatewayResponse, PaymentRequest};
use phonepe_checkout::domain::ports::{Clock, PaymentGateway, PricingResolver, Redirector};
use phonepe_checkout::error::{CheckoutError, Result};
use reqwest::Url;
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const APP_ORIGIN: &str = "http://localhost:8080";
pub const PAY_PAGE: &str = "https://mercury-uat.phonepe.com/transact/pg?token=abc";

/// Returns the same price for every lookup and remembers what was asked.
#[derive(Clone, Default)]
pub struct StaticPricing {
    price: Option<Decimal>,
    failure: Option<String>,
    pub lookups: Arc<Mutex<Vec<(String, String, BillingCycle)>>>,
}

impl StaticPricing {
    pub fn new(price: Option<Decimal>) -> Self {
        Self {
            price,
            failure: None,
            lookups: Arc::default(),
        }
    }

    /// Every lookup fails with an IO error carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl PricingResolver for StaticPricing {
    async fn price_for(
        &self,
        user_id: &str,
        plan_slug: &str,
        billing_cycle: BillingCycle,
    ) -> Result<Option<Decimal>> {
        self.lookups.lock().unwrap().push((
            user_id.to_string(),
            plan_slug.to_string(),
            billing_cycle,
        ));
        match &self.failure {
            Some(message) => Err(CheckoutError::IoError(std::io::Error::other(message.clone()))),
            None => Ok(self.price),
        }
    }
}

/// Answers with queued outcomes, falling back to a pay page redirect.
#[derive(Clone, Default)]
pub struct ScriptedGateway {
    outcomes: Arc<Mutex<VecDeque<Result<GatewayResponse>>>>,
    pub requests: Arc<Mutex<Vec<PaymentRequest>>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, outcome: Result<GatewayResponse>) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub fn requests(&self) -> Vec<PaymentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn create_payment(&self, request: &PaymentRequest) -> Result<GatewayResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(GatewayResponse::with_redirect(PAY_PAGE)))
    }
}

/// Records successful navigations. The first `fail_next` calls fail instead.
#[derive(Clone, Default)]
pub struct RecordingRedirector {
    pub visited: Arc<Mutex<Vec<Url>>>,
    failures_left: Arc<AtomicUsize>,
}

impl RecordingRedirector {
    pub fn failing(times: usize) -> Self {
        let redirector = Self::default();
        redirector.failures_left.store(times, Ordering::SeqCst);
        redirector
    }

    pub fn visited(&self) -> Vec<Url> {
        self.visited.lock().unwrap().clone()
    }
}

#[async_trait]
impl Redirector for RecordingRedirector {
    async fn navigate(&self, url: &Url) -> Result<()> {
        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(CheckoutError::Navigation("window closed".to_string()));
        }
        self.visited.lock().unwrap().push(url.clone());
        Ok(())
    }
}

/// Advances one millisecond per reading.
#[derive(Clone)]
pub struct StepClock(Arc<AtomicI64>);

impl StepClock {
    pub fn starting_at(millis: i64) -> Self {
        Self(Arc::new(AtomicI64::new(millis)))
    }
}

impl Clock for StepClock {
    fn now_millis(&self) -> i64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

pub struct Harness {
    pub initiator: CheckoutInitiator,
    pub pricing: StaticPricing,
    pub gateway: ScriptedGateway,
    pub redirector: RecordingRedirector,
    pub errors: Arc<Mutex<Vec<String>>>,
}

pub fn harness(price: Option<Decimal>, gateway: ScriptedGateway) -> Harness {
    harness_with(
        StaticPricing::new(price),
        gateway,
        RecordingRedirector::default(),
    )
}

pub fn harness_with(
    pricing: StaticPricing,
    gateway: ScriptedGateway,
    redirector: RecordingRedirector,
) -> Harness {
    let errors: Arc<Mutex<Vec<String>>> = Arc::default();

    let sink = errors.clone();
    let initiator = CheckoutInitiator::new(
        Box::new(pricing.clone()),
        Box::new(gateway.clone()),
        Box::new(redirector.clone()),
        Box::new(StepClock::starting_at(1_700_000_000_000)),
        Url::parse(APP_ORIGIN).unwrap(),
    )
    .with_error_callback(move |message| sink.lock().unwrap().push(message.to_string()));

    Harness {
        initiator,
        pricing,
        gateway,
        redirector,
        errors,
    }
}

pub fn gateway_error(message: &str) -> Result<GatewayResponse> {
    Err(CheckoutError::GatewayInvocation(message.to_string()))
}

/// A request the mock payment function received.
#[derive(Debug, Clone)]
pub struct ReceivedCall {
    pub authorization: Option<String>,
    pub apikey: Option<String>,
    pub body: serde_json::Value,
}

/// Serves `create-phonepe-payment` on a local port, answering every call with
/// `status` and `reply`. Returns the base URL to use as the Supabase URL.
pub async fn spawn_payment_function(
    status: axum::http::StatusCode,
    reply: serde_json::Value,
) -> (Url, Arc<Mutex<Vec<ReceivedCall>>>) {
    use axum::http::HeaderMap;
    use axum::{Json, Router, routing::post};

    let calls: Arc<Mutex<Vec<ReceivedCall>>> = Arc::default();
    let seen = calls.clone();
    let app = Router::new().route(
        "/functions/v1/create-phonepe-payment",
        post(
            move |headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                let header = |name: &str| {
                    headers
                        .get(name)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string)
                };
                seen.lock().unwrap().push(ReceivedCall {
                    authorization: header("authorization"),
                    apikey: header("apikey"),
                    body,
                });
                (status, Json(reply))
            },
        ),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (Url::parse(&format!("http://{}", addr)).unwrap(), calls)
}
