//! Application layer containing the checkout orchestration.
//!
//! This module defines the `CheckoutInitiator` which drives a single payment
//! attempt through pricing, the payment gateway and the redirect. It only
//! talks to the outside world through the ports in `domain::ports`.

pub mod checkout;
