//! # poker-service
//!
//! Application layer: the in-memory room store, guest identities, the
//! background persistence queue for finalized stories, and the REST DTOs.

pub mod dto;
pub mod services;

pub use services::{
    GuestDirectory, GuestIdentity, PersistenceQueue, RetryPolicy, RoomHandle, RoomService,
    RoomStore, ServiceContext, ServiceError, ServiceResult,
};
