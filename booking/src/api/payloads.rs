//! Request bodies sent to the marketplace backend.
//!
//! Field names serialise in camelCase, exactly as the backend reads them.

use crate::types::{BookingConfirmation, BookingDraft, GuestInfo, Money, PaymentInfo};
use chrono::NaiveDate;
use serde::Serialize;

/// Body of `POST /api/bookings`
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// Experience being booked
    pub experience_id: String,
    /// Selected date, `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Selected time slot
    pub time: String,
    /// Party size
    pub guests: u32,
    /// Guest contact details
    pub guest_info: GuestInfo,
    /// Payment fields plus the amount charged
    pub payment_info: PaymentPayload,
    /// Free-text requests
    pub special_requests: String,
    /// Grand total
    pub total_price: Money,
}

/// `{...paymentInfo, amount}`
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    /// Payment form fields
    #[serde(flatten)]
    pub card: PaymentInfo,
    /// Amount charged, equal to the booking total
    pub amount: Money,
}

impl CreateBookingRequest {
    /// Build the request for a complete draft
    ///
    /// Returns `None` while the date or time is still unselected.
    #[must_use]
    pub fn from_draft(draft: &BookingDraft, total: Money) -> Option<Self> {
        Some(Self {
            experience_id: draft.experience_id.as_str().to_string(),
            date: draft.selected_date?,
            time: draft.selected_time.clone()?,
            guests: draft.guest_count,
            guest_info: draft.guest_info.clone(),
            payment_info: PaymentPayload {
                card: draft.payment_info.clone(),
                amount: total,
            },
            special_requests: draft.special_requests.clone(),
            total_price: total,
        })
    }
}

/// Kind of in-app notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Booking related
    Booking,
}

/// Body of `POST /api/notifications`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    /// Always `"booking"` here
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Headline
    pub title: String,
    /// Body text
    pub message: String,
    /// Link the notification opens
    pub action_url: String,
}

impl NotificationRequest {
    /// The notification sent once a booking is confirmed
    #[must_use]
    pub fn booking_confirmed(
        experience_name: &str,
        date: NaiveDate,
        time: &str,
        confirmation: &BookingConfirmation,
    ) -> Self {
        Self {
            kind: NotificationKind::Booking,
            title: "Booking Confirmed!".to_string(),
            message: format!(
                "Your booking for {experience_name} on {} at {time} has been confirmed.",
                date.format("%B %-d, %Y")
            ),
            action_url: confirmation.action_url(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can unwrap
mod tests {
    use super::*;
    use crate::types::{ExperienceDetails, ExperienceId};
    use serde_json::json;

    fn draft() -> BookingDraft {
        let experience = ExperienceDetails {
            id: ExperienceId::new("exp-42"),
            name: "Harbour Cruise".to_string(),
            base_price: Money::from_units(100),
            min_guests: 1,
            max_guests: 6,
            availability: vec!["10:00".to_string()],
        };
        let mut draft = BookingDraft::new(&experience);
        draft.selected_date = NaiveDate::from_ymd_opt(2025, 6, 14);
        draft.selected_time = Some("10:00".to_string());
        draft.guest_count = 3;
        draft.guest_info.first_name = "Ada".to_string();
        draft.payment_info.card_number = "4242424242424242".to_string();
        draft
    }

    #[test]
    fn test_booking_request_wire_shape() {
        let request = CreateBookingRequest::from_draft(&draft(), Money::from_units(354)).unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["experienceId"], json!("exp-42"));
        assert_eq!(json["date"], json!("2025-06-14"));
        assert_eq!(json["time"], json!("10:00"));
        assert_eq!(json["guests"], json!(3));
        assert_eq!(json["guestInfo"]["firstName"], json!("Ada"));
        assert_eq!(json["paymentInfo"]["cardNumber"], json!("4242424242424242"));
        assert_eq!(json["paymentInfo"]["saveCard"], json!(false));
        assert_eq!(json["paymentInfo"]["amount"], json!(354));
        assert_eq!(json["specialRequests"], json!(""));
        assert_eq!(json["totalPrice"], json!(354));
    }

    #[test]
    fn test_incomplete_draft_has_no_request() {
        let mut incomplete = draft();
        incomplete.selected_time = None;
        assert!(CreateBookingRequest::from_draft(&incomplete, Money::ZERO).is_none());
    }

    #[test]
    fn test_confirmation_notification() {
        let confirmation = BookingConfirmation::new("BK-1").with_id("77");
        let request = NotificationRequest::booking_confirmed(
            "Harbour Cruise",
            NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
            "10:00",
            &confirmation,
        );
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            json!({
                "type": "booking",
                "title": "Booking Confirmed!",
                "message": "Your booking for Harbour Cruise on June 14, 2025 at 10:00 has been confirmed.",
                "actionUrl": "/bookings/77",
            })
        );
    }
}
