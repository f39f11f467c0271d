//! # poker-gateway
//!
//! Real-time room sessions over WebSocket, plus the REST endpoints clients use
//! to create, join and inspect rooms before connecting.

pub mod api;
pub mod broadcast;
pub mod connection;
pub mod handlers;
pub mod protocol;
pub mod server;

pub use server::{create_app, create_gateway_state, run, GatewayState};
