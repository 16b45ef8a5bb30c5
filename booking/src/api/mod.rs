//! REST collaborators of the booking wizard.
//!
//! The wizard only ever talks to the backend through [`BookingApi`] and
//! [`NotificationApi`], so reducers can capture `Arc<dyn BookingApi>` in
//! their effects and tests can swap in the doubles from [`mock`].
//!
//! # Dyn Compatibility
//!
//! The traits return explicit `Pin<Box<dyn Future>>` values instead of using
//! `async fn` so they can be used as trait objects.

pub mod catalog;
pub mod client;
pub mod error;
pub mod mock;
pub mod payloads;

pub use catalog::{ReviewSummary, normalize_experience, normalize_reviews};
pub use client::HttpClient;
pub use error::ApiError;
pub use payloads::{CreateBookingRequest, NotificationRequest};

use crate::types::BookingConfirmation;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by the API traits
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Creates bookings (`POST /api/bookings`)
pub trait BookingApi: Send + Sync {
    /// Submit a booking
    ///
    /// # Errors
    ///
    /// - `RequestFailed`: the backend could not be reached
    /// - `Status`: the backend answered with a non-2xx status
    /// - `ResponseParseFailed` / `MissingField`: the success body had no usable `reference`
    fn create_booking(&self, request: CreateBookingRequest) -> ApiFuture<'_, BookingConfirmation>;
}

/// Creates in-app notifications (`POST /api/notifications`)
pub trait NotificationApi: Send + Sync {
    /// Publish a notification; the response body is ignored
    ///
    /// # Errors
    ///
    /// `RequestFailed` or `Status`. Callers treat the call as best-effort.
    fn create_notification(&self, request: NotificationRequest) -> ApiFuture<'_, ()>;
}
