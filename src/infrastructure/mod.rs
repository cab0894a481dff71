//! Adapters implementing the domain ports: the plan catalog, the payment
//! gateways and the system clock.

pub mod clock;
pub mod in_memory;
pub mod sandbox;
pub mod supabase;
