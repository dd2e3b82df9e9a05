//! Review status polling and change notification.
//!
//! The module polls the homework status endpoint, validates the response,
//! renders the newest record into a human-readable message and delivers it
//! through a messaging channel once per distinct change. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
