//! Domain layer: checkout value objects, wire types and the ports the
//! application layer talks to.

pub mod checkout;
pub mod gateway;
pub mod money;
pub mod plan;
pub mod ports;
pub mod return_url;
