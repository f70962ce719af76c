//! Adapters Layer
//!
//! Inbound: the HTTP boundary. Outbound: the control-plane REST client.

pub mod inbound;
pub mod outbound;
