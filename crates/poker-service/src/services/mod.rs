//! Business logic services
//!
//! Room state is owned by [`RoomStore`]; every room sits behind its own lock.
//! [`RoomService`] is the REST-facing use case layer on top of it.

pub mod context;
pub mod error;
pub mod guest;
pub mod persistence;
pub mod room;
pub mod room_store;

pub use context::ServiceContext;
pub use error::{ServiceError, ServiceResult};
pub use guest::{GuestDirectory, GuestIdentity};
pub use persistence::{PersistenceQueue, RetryPolicy};
pub use room::RoomService;
pub use room_store::{RoomHandle, RoomStore};
