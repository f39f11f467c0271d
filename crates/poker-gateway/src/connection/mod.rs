//! Live room connections and the registry that maps them to participants

mod connection;
mod registry;

pub use connection::{Connection, SendError};
pub use registry::SessionRegistry;
