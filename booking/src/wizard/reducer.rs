//! The booking wizard state machine.
//!
//! Steps advance strictly one at a time. Steps 1 and 2 move forward when
//! their fields are valid; step 3 submits the booking, and only a confirmed
//! submission reaches step 4, which is terminal.
//!
//! Submission is the only I/O. It runs as a cancellable effect under
//! [`SUBMISSION`], so dismissing the wizard drops the in-flight call and a
//! late answer can never touch the state. The confirmation notification is
//! dispatched after the booking is confirmed and its failure is only logged.

use super::actions::{Field, GuestField, PaymentField, WizardAction};
use super::environment::WizardEnvironment;
use super::state::{SUBMISSION_FAILED_MESSAGE, WizardState};
use crate::api::{ApiError, CreateBookingRequest, NotificationRequest};
use crate::types::{BookingConfirmation, WizardStep};
use marketplace_core::{
    SmallVec, async_effect, cancellable_effect,
    effect::{Effect, EffectId},
    environment::Clock,
    reducer::Reducer,
    smallvec,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Cancellation scope of the in-flight booking submission
pub const SUBMISSION: EffectId = EffectId::new("booking-submission");

type Effects = SmallVec<[Effect<WizardAction>; 4]>;

/// Booking wizard reducer
///
/// Generic over the clock so tests can pin "today".
#[derive(Debug, Clone, Copy)]
pub struct WizardReducer<C> {
    _phantom: std::marker::PhantomData<C>,
}

impl<C> WizardReducer<C> {
    /// Create a new wizard reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<C> Default for WizardReducer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Reducer for WizardReducer<C> {
    type State = WizardState;
    type Action = WizardAction;
    type Environment = WizardEnvironment<C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        if state.dismissed {
            debug!(?action, "wizard dismissed, ignoring action");
            return smallvec![Effect::None];
        }

        match action {
            WizardAction::GoNext => go_next(state, env),
            WizardAction::GoPrevious => {
                go_previous(state);
                smallvec![Effect::None]
            },
            WizardAction::Submit => submit(state, env),
            WizardAction::BookingConfirmed(confirmation) => {
                booking_confirmed(state, confirmation, env)
            },
            WizardAction::BookingFailed { error } => {
                booking_failed(state, &error);
                smallvec![Effect::None]
            },
            WizardAction::NotificationSettled { delivered } => {
                state.notification_delivered = Some(delivered);
                smallvec![Effect::None]
            },
            WizardAction::Dismiss => {
                debug!(step = %state.step, in_flight = state.is_processing, "wizard dismissed");
                state.dismissed = true;
                state.is_processing = false;
                smallvec![Effect::Cancel(SUBMISSION)]
            },
            edit => {
                apply_edit(state, edit, &env.clock);
                smallvec![Effect::None]
            },
        }
    }
}

fn go_next<C: Clock>(state: &mut WizardState, env: &WizardEnvironment<C>) -> Effects {
    if state.is_processing || state.step == WizardStep::Confirmation {
        return smallvec![Effect::None];
    }
    if state.step == WizardStep::ReviewPayment {
        return submit(state, env);
    }
    if !state.is_valid(state.step) {
        debug!(step = %state.step, "step incomplete, staying");
        state.touch_step(state.step);
        return smallvec![Effect::None];
    }
    if let Some(next) = state.step.next() {
        debug!(from = %state.step, to = %next, "advancing");
        state.step = next;
    }
    smallvec![Effect::None]
}

fn go_previous(state: &mut WizardState) {
    if state.is_processing || state.step == WizardStep::Confirmation {
        return;
    }
    if let Some(previous) = state.step.previous() {
        debug!(from = %state.step, to = %previous, "going back");
        state.step = previous;
    }
}

fn submit<C: Clock>(state: &mut WizardState, env: &WizardEnvironment<C>) -> Effects {
    if state.step != WizardStep::ReviewPayment || state.is_processing {
        debug!(step = %state.step, in_flight = state.is_processing, "submit ignored");
        return smallvec![Effect::None];
    }
    if !state.is_valid(WizardStep::ReviewPayment) {
        state.touch_step(WizardStep::ReviewPayment);
        return smallvec![Effect::None];
    }
    if let Some(invalid) = state.first_invalid_step() {
        warn!(step = %invalid, "earlier step no longer valid, returning to it");
        state.touch_step(invalid);
        state.step = invalid;
        return smallvec![Effect::None];
    }

    let total = state.pricing().total;
    let Some(request) = CreateBookingRequest::from_draft(&state.draft, total) else {
        return smallvec![Effect::None];
    };

    state.is_processing = true;
    state.submission_error = None;
    debug!(experience = %state.experience.id, guests = request.guests, %total, "submitting booking");

    let bookings = Arc::clone(&env.bookings);
    smallvec![cancellable_effect! {
        id: SUBMISSION,
        async {
            match bookings.create_booking(request).await {
                Ok(confirmation) => Some(WizardAction::BookingConfirmed(confirmation)),
                Err(error) => Some(WizardAction::BookingFailed { error }),
            }
        }
    }]
}

fn booking_confirmed<C: Clock>(
    state: &mut WizardState,
    confirmation: BookingConfirmation,
    env: &WizardEnvironment<C>,
) -> Effects {
    if !state.is_processing {
        warn!(reference = %confirmation.reference, "stale booking confirmation ignored");
        return smallvec![Effect::None];
    }

    info!(
        reference = %confirmation.reference,
        experience = %state.experience.id,
        "booking confirmed"
    );
    state.is_processing = false;
    state.submission_error = None;
    state.field_errors.clear();
    state.step = WizardStep::Confirmation;

    let notification = state
        .draft
        .selected_date
        .zip(state.draft.selected_time.as_deref())
        .map(|(date, time)| {
            NotificationRequest::booking_confirmed(&state.experience.name, date, time, &confirmation)
        });
    state.confirmation = Some(confirmation);

    let Some(notification) = notification else {
        return smallvec![Effect::None];
    };
    let notifications = Arc::clone(&env.notifications);
    smallvec![async_effect! {
        let delivered = match notifications.create_notification(notification).await {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, "booking notification failed");
                false
            },
        };
        Some(WizardAction::NotificationSettled { delivered })
    }]
}

fn booking_failed(state: &mut WizardState, error: &ApiError) {
    if !state.is_processing {
        warn!(%error, "stale booking failure ignored");
        return;
    }
    if error.is_rejection() {
        warn!(%error, "booking rejected");
    } else {
        error!(%error, "booking submission failed");
    }
    state.is_processing = false;
    state.submission_error = Some(SUBMISSION_FAILED_MESSAGE.to_string());
}

fn apply_edit<C: Clock>(state: &mut WizardState, action: WizardAction, clock: &C) {
    if !state.is_editable() {
        debug!(?action, step = %state.step, "inputs locked, ignoring edit");
        return;
    }

    let field = match action {
        WizardAction::SelectDate(date) => {
            let today = clock.now().date_naive();
            if date < today {
                warn!(%date, %today, "past date rejected");
                return;
            }
            state.draft.selected_date = Some(date);
            Field::Date
        },
        WizardAction::SelectTime(time) => {
            if !state.experience.offers_slot(&time) {
                warn!(%time, "time slot not offered");
                return;
            }
            state.draft.selected_time = Some(time);
            Field::Time
        },
        WizardAction::SetGuestCount(requested) => {
            let guests = state.experience.clamp_guests(requested);
            if guests != requested {
                debug!(requested, guests, "guest count clamped");
            }
            state.draft.guest_count = guests;
            return;
        },
        WizardAction::SetSpecialRequests(text) => {
            state.draft.special_requests = text;
            Field::SpecialRequests
        },
        WizardAction::SetGuestField(guest_field, value) => {
            set_guest_field(state, guest_field, value);
            Field::Guest(guest_field)
        },
        WizardAction::SetPaymentField(payment_field, value) => {
            set_payment_field(state, payment_field, value);
            Field::Payment(payment_field)
        },
        WizardAction::SetSaveCard(save) => {
            state.draft.payment_info.save_card = save;
            return;
        },
        WizardAction::SetTermsAccepted(accepted) => {
            state.draft.terms_accepted = accepted;
            Field::Terms
        },
        WizardAction::SetMarketingOptIn(opt_in) => {
            state.draft.marketing_opt_in = opt_in;
            return;
        },
        WizardAction::BlurField(field) => {
            state.touch(field);
            return;
        },
        other => {
            debug!(action = ?other, "not an edit");
            return;
        },
    };
    state.revalidate_if_touched(field);
}

fn set_guest_field(state: &mut WizardState, field: GuestField, value: String) {
    let guest = &mut state.draft.guest_info;
    let slot = match field {
        GuestField::FirstName => &mut guest.first_name,
        GuestField::LastName => &mut guest.last_name,
        GuestField::Email => &mut guest.email,
        GuestField::Phone => &mut guest.phone,
        GuestField::EmergencyContact => &mut guest.emergency_contact,
        GuestField::DietaryRestrictions => &mut guest.dietary_restrictions,
        GuestField::AccessibilityNeeds => &mut guest.accessibility_needs,
    };
    *slot = value;
}

fn set_payment_field(state: &mut WizardState, field: PaymentField, value: String) {
    let payment = &mut state.draft.payment_info;
    let slot = match field {
        PaymentField::CardNumber => &mut payment.card_number,
        PaymentField::ExpiryDate => &mut payment.expiry_date,
        PaymentField::Cvv => &mut payment.cvv,
        PaymentField::NameOnCard => &mut payment.name_on_card,
        PaymentField::BillingAddress => &mut payment.billing_address,
    };
    *slot = value;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can unwrap
mod tests {
    use super::*;
    use crate::api::mock::{RecordingNotificationApi, ScriptedBookingApi};
    use crate::types::{ExperienceDetails, ExperienceId, Money};
    use crate::wizard::state::ConsentPolicy;
    use chrono::NaiveDate;
    use marketplace_testing::{FixedClock, ReducerTest, assertions, test_clock};

    fn reducer() -> WizardReducer<FixedClock> {
        WizardReducer::new()
    }

    fn env() -> WizardEnvironment<FixedClock> {
        WizardEnvironment::new(
            test_clock(),
            Arc::new(ScriptedBookingApi::new()),
            Arc::new(RecordingNotificationApi::new()),
        )
    }

    fn experience() -> ExperienceDetails {
        ExperienceDetails {
            id: ExperienceId::new("exp-7"),
            name: "Sunset Kayak Tour".to_string(),
            base_price: Money::from_units(100),
            min_guests: 1,
            max_guests: 6,
            availability: vec!["09:00".to_string(), "17:30".to_string()],
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 4).unwrap()
    }

    fn on_step(step: WizardStep) -> WizardState {
        let mut state = WizardState::new(experience());
        state.draft.selected_date = Some(date());
        state.draft.selected_time = Some("09:00".to_string());
        state.draft.guest_count = 3;
        let guest = &mut state.draft.guest_info;
        guest.first_name = "Ada".to_string();
        guest.last_name = "Lovelace".to_string();
        guest.email = "ada@example.com".to_string();
        guest.phone = "+1 555 010 9999".to_string();
        let payment = &mut state.draft.payment_info;
        payment.card_number = "4242 4242 4242 4242".to_string();
        payment.expiry_date = "08/27".to_string();
        payment.cvv = "123".to_string();
        payment.name_on_card = "Ada Lovelace".to_string();
        state.step = step;
        state
    }

    #[test]
    fn test_go_next_blocked_until_date_and_time() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(WizardState::new(experience()))
            .when_action(WizardAction::GoNext)
            .then_state(|state| {
                assert_eq!(state.step, WizardStep::DateTime);
                assert!(state.touched.contains(&Field::Date));
                assert_eq!(state.first_error(Field::Time), Some("Please select a time"));
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn test_select_date_time_then_advance() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(WizardState::new(experience()))
            .when_action(WizardAction::GoNext)
            .when_action(WizardAction::SelectDate(date()))
            .when_action(WizardAction::SelectTime("17:30".to_string()))
            .when_action(WizardAction::GoNext)
            .then_state(|state| {
                assert_eq!(state.step, WizardStep::GuestInfo);
                assert!(state.field_errors.is_empty());
            })
            .run();
    }

    #[test]
    fn test_past_dates_and_unknown_slots_are_ignored() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(WizardState::new(experience()))
            .when_action(WizardAction::SelectDate(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()))
            .when_action(WizardAction::SelectTime("23:00".to_string()))
            .then_state(|state| {
                assert_eq!(state.draft.selected_date, None);
                assert_eq!(state.draft.selected_time, None);
            })
            .run();
    }

    #[test]
    fn test_guest_count_is_clamped() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(WizardState::new(experience()))
            .when_action(WizardAction::SetGuestCount(40))
            .then_state(|state| assert_eq!(state.draft.guest_count, 6))
            .run();

        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(WizardState::new(experience()))
            .when_action(WizardAction::SetGuestCount(0))
            .then_state(|state| assert_eq!(state.draft.guest_count, 1))
            .run();
    }

    #[test]
    fn test_blur_shows_inline_error_and_edit_clears_it() {
        let email = Field::Guest(GuestField::Email);
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(WizardState::new(experience()))
            .when_action(WizardAction::SetGuestField(GuestField::Email, "ada@".to_string()))
            .when_action(WizardAction::BlurField(email))
            .then_state(move |state| {
                assert_eq!(state.first_error(email), Some("Please enter a valid email address"));
            })
            .run();

        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(WizardState::new(experience()))
            .when_action(WizardAction::BlurField(email))
            .when_action(WizardAction::SetGuestField(GuestField::Email, "ada@example.com".to_string()))
            .then_state(move |state| assert_eq!(state.first_error(email), None))
            .run();
    }

    #[test]
    fn test_go_previous_keeps_values() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(on_step(WizardStep::ReviewPayment))
            .when_action(WizardAction::GoPrevious)
            .when_action(WizardAction::GoPrevious)
            .when_action(WizardAction::GoPrevious)
            .then_state(|state| {
                assert_eq!(state.step, WizardStep::DateTime);
                assert_eq!(state.draft.selected_date, Some(date()));
                assert_eq!(state.draft.guest_info.first_name, "Ada");
                assert_eq!(state.draft.payment_info.cvv, "123");
            })
            .run();
    }

    #[test]
    fn test_go_next_on_payment_step_submits() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(on_step(WizardStep::ReviewPayment))
            .when_action(WizardAction::GoNext)
            .then_state(|state| {
                assert!(state.is_processing);
                assert_eq!(state.step, WizardStep::ReviewPayment);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_cancellable_effect(effects, SUBMISSION);
            })
            .run();
    }

    #[test]
    fn test_submit_while_processing_is_ignored() {
        let mut state = on_step(WizardStep::ReviewPayment);
        state.is_processing = true;
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state)
            .when_action(WizardAction::Submit)
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn test_submit_with_missing_payment_marks_fields() {
        let mut state = on_step(WizardStep::ReviewPayment);
        state.draft.payment_info.cvv.clear();
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state)
            .when_action(WizardAction::Submit)
            .then_state(|state| {
                assert!(!state.is_processing);
                assert_eq!(state.first_error(Field::Payment(PaymentField::Cvv)), Some("CVV is required"));
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn test_submit_with_broken_earlier_step_returns_to_it() {
        let email = Field::Guest(GuestField::Email);
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(on_step(WizardStep::ReviewPayment))
            .when_action(WizardAction::SetGuestField(GuestField::Email, "bad".to_string()))
            .when_action(WizardAction::Submit)
            .then_state(move |state| {
                assert!(!state.is_processing);
                assert_eq!(state.step, WizardStep::GuestInfo);
                assert_eq!(state.first_error(email), Some("Please enter a valid email address"));
                assert_eq!(state.draft.payment_info.cvv, "123");
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn test_required_terms_block_submission() {
        let state = on_step(WizardStep::ReviewPayment).with_consent_policy(ConsentPolicy::require_terms());
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state)
            .when_action(WizardAction::Submit)
            .then_state(|state| {
                assert!(!state.is_processing);
                assert!(state.first_error(Field::Terms).is_some());
            })
            .run();
    }

    #[test]
    fn test_confirmation_moves_to_final_step_and_notifies() {
        let mut state = on_step(WizardStep::ReviewPayment);
        state.is_processing = true;
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state)
            .when_action(WizardAction::BookingConfirmed(BookingConfirmation::new("BK-123")))
            .then_state(|state| {
                assert_eq!(state.step, WizardStep::Confirmation);
                assert!(!state.is_processing);
                assert_eq!(state.confirmation.as_ref().unwrap().reference, "BK-123");
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_stale_results_are_ignored() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(on_step(WizardStep::ReviewPayment))
            .when_action(WizardAction::BookingConfirmed(BookingConfirmation::new("BK-LATE")))
            .then_state(|state| {
                assert_eq!(state.step, WizardStep::ReviewPayment);
                assert!(state.confirmation.is_none());
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn test_failure_keeps_step_and_draft() {
        let mut state = on_step(WizardStep::ReviewPayment);
        state.is_processing = true;
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state)
            .when_action(WizardAction::BookingFailed {
                error: ApiError::Status { status: 502, message: "bad gateway".to_string() },
            })
            .then_state(|state| {
                assert_eq!(state.step, WizardStep::ReviewPayment);
                assert!(!state.is_processing);
                assert_eq!(state.submission_error.as_deref(), Some(SUBMISSION_FAILED_MESSAGE));
                assert_eq!(state.draft.payment_info.card_number, "4242 4242 4242 4242");
            })
            .run();
    }

    #[test]
    fn test_confirmation_step_is_terminal() {
        let mut state = on_step(WizardStep::Confirmation);
        state.confirmation = Some(BookingConfirmation::new("BK-1"));
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state)
            .when_action(WizardAction::GoPrevious)
            .when_action(WizardAction::GoNext)
            .when_action(WizardAction::SetGuestCount(2))
            .then_state(|state| {
                assert_eq!(state.step, WizardStep::Confirmation);
                assert_eq!(state.draft.guest_count, 3);
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn test_dismiss_cancels_submission_and_ignores_late_results() {
        let mut state = on_step(WizardStep::ReviewPayment);
        state.is_processing = true;
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state.clone())
            .when_action(WizardAction::Dismiss)
            .then_effects(|effects| assertions::assert_has_cancel_effect(effects, SUBMISSION))
            .run();

        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state)
            .when_action(WizardAction::Dismiss)
            .when_action(WizardAction::BookingConfirmed(BookingConfirmation::new("BK-GONE")))
            .then_state(|state| {
                assert!(state.dismissed);
                assert!(!state.is_processing);
                assert!(state.confirmation.is_none());
                assert_eq!(state.step, WizardStep::ReviewPayment);
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn test_notification_outcome_is_recorded() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(on_step(WizardStep::Confirmation))
            .when_action(WizardAction::NotificationSettled { delivered: false })
            .then_state(|state| assert_eq!(state.notification_delivered, Some(false)))
            .run();
    }
}
