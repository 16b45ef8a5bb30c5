//! Wizard state and step validity

use super::actions::{Field, GuestField, PaymentField};
use crate::pricing::{PriceBreakdown, compute_total};
use crate::types::{BookingConfirmation, BookingDraft, ExperienceDetails, WizardStep};
use crate::validation::{
    validate_card_number, validate_cvv, validate_email, validate_expiry_date, validate_name,
    validate_phone,
};
use std::collections::{BTreeMap, BTreeSet};

/// Message shown when a submission fails, whatever the cause
pub const SUBMISSION_FAILED_MESSAGE: &str =
    "We couldn't complete your booking. Please check your details and try again.";

const TERMS_REQUIRED_MESSAGE: &str = "You must accept the terms and conditions";

/// Whether final submission is gated on accepting the terms
///
/// Off by default: the checkbox is shown but not enforced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConsentPolicy {
    /// Step 3 stays invalid until the terms are accepted
    pub require_terms_acceptance: bool,
}

impl ConsentPolicy {
    /// Policy that enforces the terms checkbox
    #[must_use]
    pub const fn require_terms() -> Self {
        Self {
            require_terms_acceptance: true,
        }
    }
}

/// State of one wizard instance
#[derive(Clone, Debug)]
pub struct WizardState {
    /// What is being booked; fixed for the wizard's lifetime
    pub experience: ExperienceDetails,
    /// Active step
    pub step: WizardStep,
    /// Values entered so far
    pub draft: BookingDraft,
    /// A submission is in flight
    pub is_processing: bool,
    /// Set once the booking is confirmed
    pub confirmation: Option<BookingConfirmation>,
    /// User-facing message after a failed submission
    pub submission_error: Option<String>,
    /// Inline errors of touched fields
    pub field_errors: BTreeMap<Field, Vec<String>>,
    /// Fields whose errors are shown
    pub touched: BTreeSet<Field>,
    /// The wizard was dismissed and ignores every further action
    pub dismissed: bool,
    /// Terms gating policy of this instance
    pub consent_policy: ConsentPolicy,
    /// Outcome of the confirmation notification, once known
    pub notification_delivered: Option<bool>,
}

impl WizardState {
    /// A fresh wizard on step 1
    #[must_use]
    pub fn new(experience: ExperienceDetails) -> Self {
        Self {
            draft: BookingDraft::new(&experience),
            experience,
            step: WizardStep::DateTime,
            is_processing: false,
            confirmation: None,
            submission_error: None,
            field_errors: BTreeMap::new(),
            touched: BTreeSet::new(),
            dismissed: false,
            consent_policy: ConsentPolicy::default(),
            notification_delivered: None,
        }
    }

    /// Use a different consent policy
    #[must_use]
    pub const fn with_consent_policy(mut self, policy: ConsentPolicy) -> Self {
        self.consent_policy = policy;
        self
    }

    /// Current price, recomputed from the draft
    #[must_use]
    pub fn pricing(&self) -> PriceBreakdown {
        compute_total(self.experience.base_price, self.draft.guest_count)
    }

    /// Whether the draft satisfies `step`'s forward gate
    #[must_use]
    pub fn is_valid(&self, step: WizardStep) -> bool {
        let draft = &self.draft;
        match step {
            WizardStep::DateTime => draft.selected_date.is_some() && draft.selected_time.is_some(),
            WizardStep::GuestInfo => {
                let guest = &draft.guest_info;
                is_present(&guest.first_name)
                    && is_present(&guest.last_name)
                    && validate_email(&guest.email).is_valid
                    && validate_phone(&guest.phone).is_valid
            },
            WizardStep::ReviewPayment => {
                let payment = &draft.payment_info;
                is_present(&payment.card_number)
                    && is_present(&payment.expiry_date)
                    && is_present(&payment.cvv)
                    && is_present(&payment.name_on_card)
                    && (!self.consent_policy.require_terms_acceptance || draft.terms_accepted)
            },
            WizardStep::Confirmation => true,
        }
    }

    /// The earliest of steps 1 to 3 whose gate is not met
    #[must_use]
    pub fn first_invalid_step(&self) -> Option<WizardStep> {
        [
            WizardStep::DateTime,
            WizardStep::GuestInfo,
            WizardStep::ReviewPayment,
        ]
        .into_iter()
        .find(|step| !self.is_valid(*step))
    }

    /// Fields that must be filled in before leaving `step`
    #[must_use]
    pub fn required_fields(&self, step: WizardStep) -> Vec<Field> {
        match step {
            WizardStep::DateTime => vec![Field::Date, Field::Time],
            WizardStep::GuestInfo => [
                GuestField::FirstName,
                GuestField::LastName,
                GuestField::Email,
                GuestField::Phone,
            ]
            .into_iter()
            .map(Field::Guest)
            .collect(),
            WizardStep::ReviewPayment => {
                let mut fields: Vec<Field> = [
                    PaymentField::CardNumber,
                    PaymentField::ExpiryDate,
                    PaymentField::Cvv,
                    PaymentField::NameOnCard,
                ]
                .into_iter()
                .map(Field::Payment)
                .collect();
                if self.consent_policy.require_terms_acceptance {
                    fields.push(Field::Terms);
                }
                fields
            },
            WizardStep::Confirmation => Vec::new(),
        }
    }

    /// Whether `field` has to be filled in
    #[must_use]
    pub fn is_required(&self, field: Field) -> bool {
        [
            WizardStep::DateTime,
            WizardStep::GuestInfo,
            WizardStep::ReviewPayment,
        ]
        .into_iter()
        .any(|step| self.required_fields(step).contains(&field))
    }

    /// Inline errors for `field`'s current value
    ///
    /// Card fields run the full format checks here even though the step
    /// gate only needs them non-empty.
    #[must_use]
    pub fn validate_field(&self, field: Field) -> Vec<String> {
        let draft = &self.draft;
        let guest = &draft.guest_info;
        let payment = &draft.payment_info;
        let result = match field {
            Field::Date => {
                return missing(draft.selected_date.is_none(), "Please select a date");
            },
            Field::Time => {
                return missing(draft.selected_time.is_none(), "Please select a time");
            },
            Field::Terms => {
                return missing(
                    self.consent_policy.require_terms_acceptance && !draft.terms_accepted,
                    TERMS_REQUIRED_MESSAGE,
                );
            },
            Field::SpecialRequests
            | Field::Guest(
                GuestField::EmergencyContact
                | GuestField::DietaryRestrictions
                | GuestField::AccessibilityNeeds,
            )
            | Field::Payment(PaymentField::BillingAddress) => return Vec::new(),
            Field::Guest(GuestField::FirstName) => validate_name(&guest.first_name),
            Field::Guest(GuestField::LastName) => validate_name(&guest.last_name),
            Field::Guest(GuestField::Email) => validate_email(&guest.email),
            Field::Guest(GuestField::Phone) => validate_phone(&guest.phone),
            Field::Payment(PaymentField::CardNumber) => validate_card_number(&payment.card_number),
            Field::Payment(PaymentField::ExpiryDate) => validate_expiry_date(&payment.expiry_date),
            Field::Payment(PaymentField::Cvv) => validate_cvv(&payment.cvv),
            Field::Payment(PaymentField::NameOnCard) => validate_name(&payment.name_on_card),
        };
        result.errors
    }

    /// The value of a text field as entered
    #[must_use]
    pub fn field_value(&self, field: Field) -> String {
        let draft = &self.draft;
        let guest = &draft.guest_info;
        let payment = &draft.payment_info;
        match field {
            Field::Date => draft
                .selected_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            Field::Time => draft.selected_time.clone().unwrap_or_default(),
            Field::SpecialRequests => draft.special_requests.clone(),
            Field::Guest(GuestField::FirstName) => guest.first_name.clone(),
            Field::Guest(GuestField::LastName) => guest.last_name.clone(),
            Field::Guest(GuestField::Email) => guest.email.clone(),
            Field::Guest(GuestField::Phone) => guest.phone.clone(),
            Field::Guest(GuestField::EmergencyContact) => guest.emergency_contact.clone(),
            Field::Guest(GuestField::DietaryRestrictions) => guest.dietary_restrictions.clone(),
            Field::Guest(GuestField::AccessibilityNeeds) => guest.accessibility_needs.clone(),
            Field::Payment(PaymentField::CardNumber) => payment.card_number.clone(),
            Field::Payment(PaymentField::ExpiryDate) => payment.expiry_date.clone(),
            Field::Payment(PaymentField::Cvv) => payment.cvv.clone(),
            Field::Payment(PaymentField::NameOnCard) => payment.name_on_card.clone(),
            Field::Payment(PaymentField::BillingAddress) => payment.billing_address.clone(),
            Field::Terms => draft.terms_accepted.to_string(),
        }
    }

    /// First inline error of `field`, if shown
    #[must_use]
    pub fn first_error(&self, field: Field) -> Option<&str> {
        self.field_errors
            .get(&field)
            .and_then(|errors| errors.first())
            .map(String::as_str)
    }

    /// Inputs can be edited: not submitting, not confirmed, not dismissed
    #[must_use]
    pub fn is_editable(&self) -> bool {
        !self.is_processing && !self.dismissed && self.step != WizardStep::Confirmation
    }

    pub(crate) fn touch(&mut self, field: Field) {
        self.touched.insert(field);
        self.refresh_errors(field);
    }

    pub(crate) fn touch_step(&mut self, step: WizardStep) {
        for field in self.required_fields(step) {
            self.touch(field);
        }
    }

    pub(crate) fn revalidate_if_touched(&mut self, field: Field) {
        if self.touched.contains(&field) {
            self.refresh_errors(field);
        }
    }

    fn refresh_errors(&mut self, field: Field) {
        let errors = self.validate_field(field);
        if errors.is_empty() {
            self.field_errors.remove(&field);
        } else {
            self.field_errors.insert(field, errors);
        }
    }
}

fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

fn missing(is_missing: bool, message: &str) -> Vec<String> {
    if is_missing {
        vec![message.to_string()]
    } else {
        Vec::new()
    }
}
