//! In-memory test doubles for the booking collaborators

use crate::api::payloads::{CreateBookingRequest, NotificationRequest};
use crate::api::{ApiError, ApiFuture, BookingApi, NotificationApi};
use crate::types::BookingConfirmation;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Booking API that replays queued outcomes
///
/// Once the queue is empty every call succeeds with a fresh `BK-` reference.
#[derive(Debug, Default)]
pub struct ScriptedBookingApi {
    outcomes: Mutex<VecDeque<Result<BookingConfirmation, ApiError>>>,
    requests: Mutex<Vec<CreateBookingRequest>>,
    calls: AtomicUsize,
    latency: Option<Duration>,
}

impl ScriptedBookingApi {
    /// Always succeeds
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replays `outcomes` in order, then succeeds
    #[must_use]
    pub fn with_outcomes(
        outcomes: impl IntoIterator<Item = Result<BookingConfirmation, ApiError>>,
    ) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Delay every answer by `latency`
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue one more outcome
    pub fn push_outcome(&self, outcome: Result<BookingConfirmation, ApiError>) {
        lock(&self.outcomes).push_back(outcome);
    }

    /// Number of `create_booking` calls started
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far
    #[must_use]
    pub fn requests(&self) -> Vec<CreateBookingRequest> {
        lock(&self.requests).clone()
    }

    fn next_outcome(&self) -> Result<BookingConfirmation, ApiError> {
        lock(&self.outcomes).pop_front().unwrap_or_else(|| {
            let suffix = uuid::Uuid::new_v4().simple().to_string();
            Ok(BookingConfirmation::new(format!("BK-{}", &suffix[..8].to_uppercase())))
        })
    }
}

impl BookingApi for ScriptedBookingApi {
    fn create_booking(&self, request: CreateBookingRequest) -> ApiFuture<'_, BookingConfirmation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.requests).push(request);
        let outcome = self.next_outcome();
        let latency = self.latency;
        Box::pin(async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            outcome
        })
    }
}

/// Notification API that records every request
#[derive(Debug, Default)]
pub struct RecordingNotificationApi {
    requests: Mutex<Vec<NotificationRequest>>,
    fail: bool,
}

impl RecordingNotificationApi {
    /// Accepts every notification
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every notification, then answers `503`
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Requests received so far
    #[must_use]
    pub fn requests(&self) -> Vec<NotificationRequest> {
        lock(&self.requests).clone()
    }

    /// Number of requests received
    #[must_use]
    pub fn calls(&self) -> usize {
        lock(&self.requests).len()
    }
}

impl NotificationApi for RecordingNotificationApi {
    fn create_notification(&self, request: NotificationRequest) -> ApiFuture<'_, ()> {
        lock(&self.requests).push(request);
        let result = if self.fail {
            Err(ApiError::Status {
                status: 503,
                message: "notifications unavailable".to_string(),
            })
        } else {
            Ok(())
        };
        Box::pin(async move { result })
    }
}
