//! Room fan-out

mod hub;

pub use hub::BroadcastHub;
