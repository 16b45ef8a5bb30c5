//! Price calculation for a booking.
//!
//! The service fee and taxes are each rounded to the nearest whole currency
//! unit before they are added up, so `total` is not `round(subtotal * 1.18)`.

use crate::types::Money;
use serde::Serialize;

/// Service fee rate, in percent of the subtotal
pub const SERVICE_FEE_PERCENT: u64 = 8;

/// Tax rate, in percent of the subtotal
pub const TAX_PERCENT: u64 = 10;

/// Derived pricing for a draft
///
/// Never stored; recompute it from the base price and guest count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// `base_price * guests`
    pub subtotal: Money,
    /// Service fee, whole units
    pub service_fee: Money,
    /// Taxes, whole units
    pub taxes: Money,
    /// Sum of the three above
    pub total: Money,
}

/// Compute the price breakdown for `guests` at `base_price` each
///
/// # Example
///
/// ```
/// use booking::pricing::compute_total;
/// use booking::types::Money;
///
/// let price = compute_total(Money::from_units(100), 3);
/// assert_eq!(price.subtotal, Money::from_units(300));
/// assert_eq!(price.service_fee, Money::from_units(24));
/// assert_eq!(price.taxes, Money::from_units(30));
/// assert_eq!(price.total, Money::from_units(354));
/// ```
#[must_use]
pub fn compute_total(base_price: Money, guests: u32) -> PriceBreakdown {
    let subtotal = base_price.saturating_multiply(guests);
    let service_fee = percent_rounded_to_units(subtotal, SERVICE_FEE_PERCENT);
    let taxes = percent_rounded_to_units(subtotal, TAX_PERCENT);

    PriceBreakdown {
        subtotal,
        service_fee,
        taxes,
        total: subtotal.saturating_add(service_fee).saturating_add(taxes),
    }
}

/// `percent`% of `amount`, rounded half-up to whole units
fn percent_rounded_to_units(amount: Money, percent: u64) -> Money {
    // cents * percent / 100 gives cents; a further / 100 gives units
    let scaled = amount.cents().saturating_mul(percent);
    Money::from_units(scaled.saturating_add(5_000) / 10_000)
}
