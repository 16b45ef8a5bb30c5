//! What each step shows.
//!
//! [`render`] turns the wizard state into a plain description of the active
//! step. It holds no logic of its own beyond formatting: every enabled flag
//! and error comes from [`WizardState`].

use super::actions::{Field, GuestField, PaymentField};
use super::state::WizardState;
use crate::types::{Money, WizardStep};
use serde::Serialize;

/// Description of the active step
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
    /// Active step
    pub step: WizardStep,
    /// `1..=4`
    pub step_number: u8,
    /// Step heading
    pub title: &'static str,
    /// Inputs of the step, in display order
    pub fields: Vec<FieldView>,
    /// Checkboxes of the step
    pub checkboxes: Vec<CheckboxView>,
    /// Offered time slots (step 1 only)
    pub time_options: Vec<String>,
    /// Selectable guest counts (step 1 only), exactly the allowed range
    pub guest_options: Vec<u32>,
    /// Currently selected guest count
    pub guest_count: u32,
    /// Booking recap (steps 3 and 4)
    pub summary: Option<BookingSummary>,
    /// Price breakdown lines
    pub price_summary: PriceSummary,
    /// Primary button, absent on the final step
    pub primary_action: Option<PrimaryAction>,
    /// Whether "Previous" is offered and enabled
    pub can_go_back: bool,
    /// A submission is in flight
    pub is_processing: bool,
    /// Message of the last failed submission
    pub submission_error: Option<String>,
    /// Reference of the confirmed booking (step 4)
    pub confirmation_reference: Option<String>,
}

/// One text or select input
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    /// Which input
    #[serde(skip)]
    pub field: Field,
    /// Visible label
    pub label: &'static str,
    /// Current value
    pub value: String,
    /// Marked as required
    pub required: bool,
    /// First inline error, once the field was touched
    pub error: Option<String>,
}

/// One checkbox
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckboxView {
    /// Visible label
    pub label: &'static str,
    /// Current value
    pub checked: bool,
    /// Inline error, if the box is required and unchecked
    pub error: Option<String>,
}

/// The primary button of a step
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryAction {
    /// `Next`, `Complete Booking` or `Processing...`
    pub label: &'static str,
    /// Clickable
    pub enabled: bool,
}

/// Booking recap shown before paying and after confirmation
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    /// Experience name
    pub experience: String,
    /// e.g. `Friday, July 4, 2025`
    pub date: String,
    /// Selected slot
    pub time: String,
    /// Party size
    pub guests: u32,
    /// Guest full name
    pub guest_name: String,
}

/// One line of the price breakdown
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceLine {
    /// e.g. `$100.00 x 3 guests`
    pub label: String,
    /// Amount
    pub amount: Money,
}

/// Price breakdown
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSummary {
    /// Subtotal, service fee and taxes
    pub lines: Vec<PriceLine>,
    /// Grand total
    pub total: Money,
}

/// Describe the active step of `state`
#[must_use]
pub fn render(state: &WizardState) -> StepView {
    let step = state.step;
    let fields = visible_fields(step)
        .into_iter()
        .map(|field| FieldView {
            field,
            label: field.label(),
            value: state.field_value(field),
            required: state.is_required(field),
            error: state.first_error(field).map(str::to_string),
        })
        .collect();

    let on_first_step = step == WizardStep::DateTime;

    StepView {
        step,
        step_number: step.number(),
        title: step.title(),
        fields,
        checkboxes: checkboxes(state),
        time_options: if on_first_step {
            state.experience.availability.clone()
        } else {
            Vec::new()
        },
        guest_options: if on_first_step {
            state.experience.guest_range().collect()
        } else {
            Vec::new()
        },
        guest_count: state.draft.guest_count,
        summary: matches!(step, WizardStep::ReviewPayment | WizardStep::Confirmation)
            .then(|| booking_summary(state)),
        price_summary: price_summary(state),
        primary_action: primary_action(state),
        can_go_back: matches!(step, WizardStep::GuestInfo | WizardStep::ReviewPayment)
            && !state.is_processing,
        is_processing: state.is_processing,
        submission_error: state.submission_error.clone(),
        confirmation_reference: state
            .confirmation
            .as_ref()
            .map(|confirmation| confirmation.reference.clone()),
    }
}

fn visible_fields(step: WizardStep) -> Vec<Field> {
    match step {
        WizardStep::DateTime => vec![Field::Date, Field::Time, Field::SpecialRequests],
        WizardStep::GuestInfo => GuestField::ALL.into_iter().map(Field::Guest).collect(),
        WizardStep::ReviewPayment => PaymentField::ALL.into_iter().map(Field::Payment).collect(),
        WizardStep::Confirmation => Vec::new(),
    }
}

fn checkboxes(state: &WizardState) -> Vec<CheckboxView> {
    if state.step != WizardStep::ReviewPayment {
        return Vec::new();
    }
    let draft = &state.draft;
    vec![
        CheckboxView {
            label: "Save card for future bookings",
            checked: draft.payment_info.save_card,
            error: None,
        },
        CheckboxView {
            label: Field::Terms.label(),
            checked: draft.terms_accepted,
            error: state.first_error(Field::Terms).map(str::to_string),
        },
        CheckboxView {
            label: "Send me offers and updates",
            checked: draft.marketing_opt_in,
            error: None,
        },
    ]
}

fn primary_action(state: &WizardState) -> Option<PrimaryAction> {
    let valid = state.is_valid(state.step) && !state.is_processing;
    match state.step {
        WizardStep::DateTime | WizardStep::GuestInfo => Some(PrimaryAction {
            label: "Next",
            enabled: valid,
        }),
        WizardStep::ReviewPayment => Some(PrimaryAction {
            label: if state.is_processing {
                "Processing..."
            } else {
                "Complete Booking"
            },
            // Submission needs every earlier step to still hold
            enabled: state.first_invalid_step().is_none() && !state.is_processing,
        }),
        WizardStep::Confirmation => None,
    }
}

fn booking_summary(state: &WizardState) -> BookingSummary {
    let draft = &state.draft;
    let guest = &draft.guest_info;
    BookingSummary {
        experience: state.experience.name.clone(),
        date: draft
            .selected_date
            .map(|date| date.format("%A, %B %-d, %Y").to_string())
            .unwrap_or_default(),
        time: draft.selected_time.clone().unwrap_or_default(),
        guests: draft.guest_count,
        guest_name: format!("{} {}", guest.first_name.trim(), guest.last_name.trim())
            .trim()
            .to_string(),
    }
}

fn price_summary(state: &WizardState) -> PriceSummary {
    let price = state.pricing();
    let guests = state.draft.guest_count;
    let noun = if guests == 1 { "guest" } else { "guests" };
    PriceSummary {
        lines: vec![
            PriceLine {
                label: format!("{} x {guests} {noun}", state.experience.base_price),
                amount: price.subtotal,
            },
            PriceLine {
                label: "Service fee".to_string(),
                amount: price.service_fee,
            },
            PriceLine {
                label: "Taxes".to_string(),
                amount: price.taxes,
            },
        ],
        total: price.total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BookingConfirmation, ExperienceDetails, ExperienceId};
    use chrono::NaiveDate;

    fn state() -> WizardState {
        WizardState::new(ExperienceDetails {
            id: ExperienceId::new("exp-7"),
            name: "Sunset Kayak Tour".to_string(),
            base_price: Money::from_units(100),
            min_guests: 2,
            max_guests: 5,
            availability: vec!["09:00".to_string(), "17:30".to_string()],
        })
    }

    #[test]
    fn test_first_step_view() {
        let view = render(&state());
        assert_eq!(view.step_number, 1);
        assert_eq!(view.title, "Select Date & Time");
        assert_eq!(view.guest_options, vec![2, 3, 4, 5]);
        assert_eq!(view.time_options, vec!["09:00", "17:30"]);
        assert_eq!(
            view.primary_action,
            Some(PrimaryAction { label: "Next", enabled: false })
        );
        assert!(!view.can_go_back);
        assert!(view.summary.is_none());
        assert_eq!(view.price_summary.lines[0].label, "$100.00 x 2 guests");
        assert_eq!(view.price_summary.total, Money::from_units(236));
    }

    #[test]
    fn test_payment_step_labels() {
        let mut state = state();
        state.step = WizardStep::ReviewPayment;
        state.draft.selected_date = NaiveDate::from_ymd_opt(2025, 7, 4);
        state.draft.selected_time = Some("09:00".to_string());
        state.draft.guest_info.first_name = "Ada".to_string();

        let view = render(&state);
        assert_eq!(view.primary_action.as_ref().map(|a| a.label), Some("Complete Booking"));
        assert!(view.can_go_back);
        assert_eq!(view.fields.len(), 5);
        assert_eq!(view.checkboxes.len(), 3);
        let summary = view.summary.as_ref().map(|s| (s.date.as_str(), s.guest_name.as_str()));
        assert_eq!(summary, Some(("Friday, July 4, 2025", "Ada")));

        state.is_processing = true;
        let view = render(&state);
        assert_eq!(
            view.primary_action,
            Some(PrimaryAction { label: "Processing...", enabled: false })
        );
        assert!(!view.can_go_back);
    }

    #[test]
    fn test_complete_booking_disabled_when_guest_details_broken() {
        let mut state = state();
        state.step = WizardStep::ReviewPayment;
        state.draft.selected_date = NaiveDate::from_ymd_opt(2025, 7, 4);
        state.draft.selected_time = Some("09:00".to_string());
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

        let enabled = |state: &WizardState| render(state).primary_action.map(|a| a.enabled);
        assert_eq!(enabled(&state), Some(true));

        state.draft.guest_info.email = "bad".to_string();
        assert_eq!(enabled(&state), Some(false));
    }

    #[test]
    fn test_field_errors_are_rendered() {
        let mut state = state();
        state.step = WizardStep::GuestInfo;
        state.touch_step(WizardStep::GuestInfo);

        let view = render(&state);
        let email = view
            .fields
            .iter()
            .find(|f| f.field == Field::Guest(GuestField::Email))
            .map(|f| (f.required, f.error.clone()));
        assert_eq!(email, Some((true, Some("Email is required".to_string()))));
        let dietary = view
            .fields
            .iter()
            .find(|f| f.field == Field::Guest(GuestField::DietaryRestrictions))
            .map(|f| (f.required, f.error.clone()));
        assert_eq!(dietary, Some((false, None)));
    }

    #[test]
    fn test_confirmation_view() {
        let mut state = state();
        state.step = WizardStep::Confirmation;
        state.confirmation = Some(BookingConfirmation::new("BK-9"));

        let view = render(&state);
        assert_eq!(view.title, "Booking Confirmed");
        assert!(view.primary_action.is_none());
        assert!(!view.can_go_back);
        assert_eq!(view.confirmation_reference.as_deref(), Some("BK-9"));
    }
}
