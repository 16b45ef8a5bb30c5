//! Injected dependencies of the booking wizard

use crate::api::{BookingApi, NotificationApi};
use marketplace_core::environment::Clock;
use std::sync::Arc;

/// Wizard environment
///
/// The clock decides which dates are in the past; the two APIs are captured
/// by the effects the reducer returns.
#[derive(Clone)]
pub struct WizardEnvironment<C: Clock> {
    /// Current time
    pub clock: C,
    /// Booking creation
    pub bookings: Arc<dyn BookingApi>,
    /// Best-effort notifications
    pub notifications: Arc<dyn NotificationApi>,
}

impl<C: Clock> WizardEnvironment<C> {
    /// Create an environment
    #[must_use]
    pub fn new(
        clock: C,
        bookings: Arc<dyn BookingApi>,
        notifications: Arc<dyn NotificationApi>,
    ) -> Self {
        Self {
            clock,
            bookings,
            notifications,
        }
    }
}

impl<C: Clock + std::fmt::Debug> std::fmt::Debug for WizardEnvironment<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardEnvironment")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
