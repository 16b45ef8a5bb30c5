//! Domain types for the booking wizard.
//!
//! Value objects (`ExperienceId`, `Money`), the external inputs of a wizard
//! instance (`ExperienceDetails`), the mutable `BookingDraft`, the
//! `WizardStep` enum and the server-assigned `BookingConfirmation`.

use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::RangeInclusive;

// ============================================================================
// Identifiers
// ============================================================================

/// Reference to the external experience/product being booked
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperienceId(String);

impl ExperienceId {
    /// Creates an `ExperienceId` from any string-like value
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExperienceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// Represents money in cents to avoid floating-point arithmetic errors
///
/// On the wire money is a plain JSON number of currency units (`354` or
/// `49.99`), matching what the booking backend expects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(u64);

impl Money {
    /// Zero
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a `Money` value from whole currency units, saturating on overflow
    #[must_use]
    pub const fn from_units(units: u64) -> Self {
        Self(units.saturating_mul(100))
    }

    /// Creates a `Money` value from a decimal amount of currency units
    ///
    /// Returns `None` for negative, NaN or infinite amounts.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )] // Range checked before the cast
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return None;
        }
        let cents = (amount * 100.0).round();
        if cents > u64::MAX as f64 {
            return None;
        }
        Some(Self(cents as u64))
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Returns the whole currency units (rounded down)
    #[must_use]
    pub const fn units(&self) -> u64 {
        self.0 / 100
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two money amounts with overflow checking
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Adds two money amounts, saturating at the maximum
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Multiplies money by a quantity with overflow checking
    #[must_use]
    pub const fn checked_multiply(self, quantity: u32) -> Option<Self> {
        match self.0.checked_mul(quantity as u64) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Multiplies money by a quantity, saturating at the maximum
    #[must_use]
    pub const fn saturating_multiply(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_u64(self.0 / 100)
        } else {
            #[allow(clippy::cast_precision_loss)] // Amounts stay far below 2^52 cents
            let units = self.0 as f64 / 100.0;
            serializer.serialize_f64(units)
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Self::from_decimal(amount)
            .ok_or_else(|| de::Error::custom(format!("invalid money amount: {amount}")))
    }
}

// ============================================================================
// Experience (external inputs of a wizard instance)
// ============================================================================

/// The experience being booked, as supplied to the wizard
///
/// Immutable for the lifetime of a wizard instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceDetails {
    /// Experience id
    pub id: ExperienceId,
    /// Display name, referenced by the booking notification
    pub name: String,
    /// Price per guest
    pub base_price: Money,
    /// Smallest bookable party
    pub min_guests: u32,
    /// Largest bookable party
    pub max_guests: u32,
    /// Offered time slots
    pub availability: Vec<String>,
}

impl ExperienceDetails {
    /// The selectable guest counts (closed range)
    ///
    /// A booking is at least one guest, so a `min_guests` of 0 offers from 1.
    #[must_use]
    pub fn guest_range(&self) -> RangeInclusive<u32> {
        let min = self.min_guests.max(1);
        min..=self.max_guests.max(min)
    }

    /// Clamp a requested guest count into [`Self::guest_range`]
    #[must_use]
    pub fn clamp_guests(&self, requested: u32) -> u32 {
        let range = self.guest_range();
        requested.clamp(*range.start(), *range.end())
    }

    /// Whether `slot` is one of the offered time slots
    #[must_use]
    pub fn offers_slot(&self, slot: &str) -> bool {
        self.availability.iter().any(|offered| offered == slot)
    }
}

// ============================================================================
// Draft
// ============================================================================

/// Guest contact details collected in step 2
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestInfo {
    /// First name (required)
    pub first_name: String,
    /// Last name (required)
    pub last_name: String,
    /// Email (required, format checked)
    pub email: String,
    /// Phone (required, format checked)
    pub phone: String,
    /// Emergency contact
    pub emergency_contact: String,
    /// Dietary restrictions
    pub dietary_restrictions: String,
    /// Accessibility needs
    pub accessibility_needs: String,
}

/// Payment form fields collected in step 3
///
/// Front-end demonstration only: the values are forwarded to the booking
/// backend and never processed locally. `Debug` masks the card data.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    /// Card number
    pub card_number: String,
    /// Expiry in `MM/YY`
    pub expiry_date: String,
    /// Card verification value
    pub cvv: String,
    /// Cardholder name
    pub name_on_card: String,
    /// Billing address
    pub billing_address: String,
    /// Whether the user asked to save the card
    pub save_card: bool,
}

impl PaymentInfo {
    /// Last four digits of the card number, if any were entered
    #[must_use]
    pub fn card_last_four(&self) -> Option<String> {
        let digits: Vec<char> = self.card_number.chars().filter(char::is_ascii_digit).collect();
        (digits.len() >= 4).then(|| digits[digits.len() - 4..].iter().collect())
    }
}

impl fmt::Debug for PaymentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let card = self
            .card_last_four()
            .map_or_else(|| "<empty>".to_string(), |last| format!("**** {last}"));
        f.debug_struct("PaymentInfo")
            .field("card_number", &card)
            .field("expiry_date", &self.expiry_date)
            .field("cvv", &"***")
            .field("name_on_card", &self.name_on_card)
            .field("billing_address", &self.billing_address)
            .field("save_card", &self.save_card)
            .finish()
    }
}

/// The mutable in-progress booking owned by one wizard instance
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingDraft {
    /// Experience being booked
    pub experience_id: ExperienceId,
    /// Selected date (required before leaving step 1)
    pub selected_date: Option<NaiveDate>,
    /// Selected time slot (required before leaving step 1)
    pub selected_time: Option<String>,
    /// Party size, always inside the experience's guest range
    pub guest_count: u32,
    /// Free-text requests, not validated
    pub special_requests: String,
    /// Step 2 fields
    pub guest_info: GuestInfo,
    /// Step 3 fields
    pub payment_info: PaymentInfo,
    /// Terms and conditions checkbox
    pub terms_accepted: bool,
    /// Marketing consent checkbox
    pub marketing_opt_in: bool,
}

impl BookingDraft {
    /// Fresh draft for an experience, guest count defaulting to the minimum
    #[must_use]
    pub fn new(experience: &ExperienceDetails) -> Self {
        Self {
            experience_id: experience.id.clone(),
            selected_date: None,
            selected_time: None,
            guest_count: *experience.guest_range().start(),
            special_requests: String::new(),
            guest_info: GuestInfo::default(),
            payment_info: PaymentInfo::default(),
            terms_accepted: false,
            marketing_opt_in: false,
        }
    }
}

// ============================================================================
// Wizard step
// ============================================================================

/// One of the four sequential wizard stages
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WizardStep {
    /// Date, time and party size
    #[default]
    DateTime,
    /// Guest contact details
    GuestInfo,
    /// Order review and payment
    ReviewPayment,
    /// Terminal confirmation
    Confirmation,
}

impl WizardStep {
    /// 1-based position of the step
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::DateTime => 1,
            Self::GuestInfo => 2,
            Self::ReviewPayment => 3,
            Self::Confirmation => 4,
        }
    }

    /// Step for a 1-based position
    #[must_use]
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::DateTime),
            2 => Some(Self::GuestInfo),
            3 => Some(Self::ReviewPayment),
            4 => Some(Self::Confirmation),
            _ => None,
        }
    }

    /// The following step, `None` from the terminal step
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::DateTime => Some(Self::GuestInfo),
            Self::GuestInfo => Some(Self::ReviewPayment),
            Self::ReviewPayment => Some(Self::Confirmation),
            Self::Confirmation => None,
        }
    }

    /// The preceding step, `None` from the first step
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::DateTime => None,
            Self::GuestInfo => Some(Self::DateTime),
            Self::ReviewPayment => Some(Self::GuestInfo),
            Self::Confirmation => Some(Self::ReviewPayment),
        }
    }

    /// Heading shown for the step
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::DateTime => "Select Date & Time",
            Self::GuestInfo => "Guest Information",
            Self::ReviewPayment => "Review & Payment",
            Self::Confirmation => "Booking Confirmed",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.title())
    }
}

// ============================================================================
// Confirmation
// ============================================================================

/// Server-assigned booking confirmation, displayed read-only in step 4
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    /// Booking reference shown to the user
    #[serde(deserialize_with = "required_string_or_number")]
    pub reference: String,
    /// Server id, used for the follow-up link
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    /// Remaining fields echoed by the server
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BookingConfirmation {
    /// Confirmation with only a reference
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            id: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Attach the server id
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Link to the booking detail page
    #[must_use]
    pub fn action_url(&self) -> String {
        self.id
            .as_ref()
            .map_or_else(|| "/bookings".to_string(), |id| format!("/bookings/{id}"))
    }
}

/// Accepts `"42"`, `42` or `null`
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!("unexpected id: {other}"))),
    }
}

/// Accepts `"BK-1"` or `1001`
fn required_string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    string_or_number(deserializer)?.ok_or_else(|| de::Error::custom("reference is null"))
}
