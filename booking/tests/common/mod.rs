//! Shared fixtures for the booking integration tests

#![allow(dead_code)] // Not every test file uses every fixture

use booking::api::mock::{RecordingNotificationApi, ScriptedBookingApi};
use booking::types::{ExperienceDetails, ExperienceId, Money, WizardStep};
use booking::wizard::{WizardAction, WizardEnvironment, WizardReducer, WizardState};
use chrono::NaiveDate;
use marketplace_runtime::Store;
use marketplace_testing::{FixedClock, test_clock};
use std::sync::Arc;

pub type WizardStore =
    Store<WizardState, WizardAction, WizardEnvironment<FixedClock>, WizardReducer<FixedClock>>;

pub fn experience() -> ExperienceDetails {
    ExperienceDetails {
        id: ExperienceId::new("exp-kayak"),
        name: "Sunset Kayak Tour".to_string(),
        base_price: Money::from_units(100),
        min_guests: 1,
        max_guests: 6,
        availability: vec!["09:00".to_string(), "17:30".to_string()],
    }
}

pub fn booking_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 4).unwrap_or_default()
}

/// A wizard on `step` with every required field of steps 1 to 3 filled in
pub fn filled_state(step: WizardStep) -> WizardState {
    let mut state = WizardState::new(experience());
    state.draft.selected_date = Some(booking_date());
    state.draft.selected_time = Some("17:30".to_string());
    state.draft.guest_count = 3;
    let guest = &mut state.draft.guest_info;
    guest.first_name = "Ada".to_string();
    guest.last_name = "Lovelace".to_string();
    guest.email = "ada@example.com".to_string();
    guest.phone = "+44 20 7946 0958".to_string();
    let payment = &mut state.draft.payment_info;
    payment.card_number = "4242 4242 4242 4242".to_string();
    payment.expiry_date = "08/29".to_string();
    payment.cvv = "123".to_string();
    payment.name_on_card = "Ada Lovelace".to_string();
    state.step = step;
    state
}

pub fn store(
    state: WizardState,
    bookings: &Arc<ScriptedBookingApi>,
    notifications: &Arc<RecordingNotificationApi>,
) -> WizardStore {
    Store::new(
        state,
        WizardReducer::new(),
        WizardEnvironment::new(test_clock(), bookings.clone(), notifications.clone()),
    )
}
