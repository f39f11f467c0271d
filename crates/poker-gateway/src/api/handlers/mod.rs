//! Request handlers

pub mod guests;
pub mod health;
pub mod rooms;
