//! Actions accepted by the booking wizard

use crate::api::ApiError;
use crate::types::BookingConfirmation;
use chrono::NaiveDate;
use std::fmt;

/// Text fields of step 2
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GuestField {
    /// Required
    FirstName,
    /// Required
    LastName,
    /// Required, format checked
    Email,
    /// Required, format checked
    Phone,
    /// Optional
    EmergencyContact,
    /// Optional
    DietaryRestrictions,
    /// Optional
    AccessibilityNeeds,
}

impl GuestField {
    /// Every guest field, in display order
    pub const ALL: [Self; 7] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::EmergencyContact,
        Self::DietaryRestrictions,
        Self::AccessibilityNeeds,
    ];
}

/// Text fields of step 3
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PaymentField {
    /// Required
    CardNumber,
    /// Required, `MM/YY`
    ExpiryDate,
    /// Required
    Cvv,
    /// Required
    NameOnCard,
    /// Optional
    BillingAddress,
}

impl PaymentField {
    /// Every payment field, in display order
    pub const ALL: [Self; 5] = [
        Self::CardNumber,
        Self::ExpiryDate,
        Self::Cvv,
        Self::NameOnCard,
        Self::BillingAddress,
    ];
}

/// Any input that can carry an inline validation error
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// Step 1 date picker
    Date,
    /// Step 1 time slot
    Time,
    /// Step 1 free-text requests
    SpecialRequests,
    /// Step 2 inputs
    Guest(GuestField),
    /// Step 3 inputs
    Payment(PaymentField),
    /// Step 3 terms checkbox
    Terms,
}

impl Field {
    /// Label shown next to the input
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Time => "Time",
            Self::SpecialRequests => "Special Requests",
            Self::Guest(GuestField::FirstName) => "First Name",
            Self::Guest(GuestField::LastName) => "Last Name",
            Self::Guest(GuestField::Email) => "Email",
            Self::Guest(GuestField::Phone) => "Phone",
            Self::Guest(GuestField::EmergencyContact) => "Emergency Contact",
            Self::Guest(GuestField::DietaryRestrictions) => "Dietary Restrictions",
            Self::Guest(GuestField::AccessibilityNeeds) => "Accessibility Needs",
            Self::Payment(PaymentField::CardNumber) => "Card Number",
            Self::Payment(PaymentField::ExpiryDate) => "Expiry Date",
            Self::Payment(PaymentField::Cvv) => "CVV",
            Self::Payment(PaymentField::NameOnCard) => "Name on Card",
            Self::Payment(PaymentField::BillingAddress) => "Billing Address",
            Self::Terms => "I agree to the terms and conditions",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything that can happen to a wizard
#[derive(Clone, Debug, PartialEq)]
pub enum WizardAction {
    /// Primary action on steps 1 and 2; submits on step 3
    GoNext,
    /// Back one step, keeping every entered value
    GoPrevious,
    /// "Complete Booking" on step 3
    Submit,

    /// Pick a date (past dates are ignored)
    SelectDate(NaiveDate),
    /// Pick one of the offered time slots
    SelectTime(String),
    /// Change the party size (clamped to the experience's range)
    SetGuestCount(u32),
    /// Edit the free-text requests
    SetSpecialRequests(String),
    /// Edit a step 2 field
    SetGuestField(GuestField, String),
    /// Edit a step 3 field
    SetPaymentField(PaymentField, String),
    /// Toggle "save card"
    SetSaveCard(bool),
    /// Toggle terms acceptance
    SetTermsAccepted(bool),
    /// Toggle marketing consent
    SetMarketingOptIn(bool),
    /// The user left a field; show its errors from now on
    BlurField(Field),

    /// The booking backend accepted the submission
    BookingConfirmed(BookingConfirmation),
    /// The submission failed
    BookingFailed {
        /// What went wrong
        error: ApiError,
    },
    /// The best-effort notification finished
    NotificationSettled {
        /// Whether the backend accepted it
        delivered: bool,
    },

    /// The wizard is going away; drop in-flight work and ignore late results
    Dismiss,
}
