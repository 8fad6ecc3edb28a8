//! # moim-core
//!
//! Core types, traits, and errors shared across the moim backend crates.
//!
//! This crate provides:
//! - The notification domain model and its per-event-type message templates
//! - The `NotificationRepository` persistence trait
//! - The common `Error`/`Result` types
//! - Structured logging field-name constants

pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

pub use error::{Error, Result};
pub use models::{
    NewNotification, Notification, NotificationResponse, NotificationType, RelatedRef, RelatedType,
};
pub use traits::NotificationRepository;
