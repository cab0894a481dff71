use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Please log in to continue with the payment")]
    Unauthenticated,
    #[error("A payment is already being submitted")]
    AlreadySubmitting,
    #[error("Pricing lookup failed: {0}")]
    Pricing(String),
    #[error("Invalid price: {0}")]
    InvalidPrice(Decimal),
    #[error("Payment gateway error: {0}")]
    GatewayInvocation(String),
    #[error("Payment gateway did not return a redirect URL")]
    MissingRedirectUrl,
    #[error("Navigation failed: {0}")]
    Navigation(String),
    #[error("Invalid return URL: {0}")]
    InvalidReturnUrl(String),
    #[error("Invalid billing cycle: {0}")]
    InvalidBillingCycle(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
