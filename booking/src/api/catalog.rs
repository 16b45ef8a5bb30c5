//! Normalization of catalog responses into typed view models.
//!
//! Catalog endpoints answer with loosely-shaped JSON: keys may be snake_case
//! or camelCase, numbers may arrive as strings, optional fields may be
//! missing. Each endpoint gets exactly one function here that turns the raw
//! value into a fully-typed model with explicit defaults. Untyped JSON never
//! goes past this module.

use crate::api::ApiError;
use crate::types::{ExperienceDetails, ExperienceId, Money};
use serde::Serialize;
use serde_json::Value;

const DEFAULT_MIN_GUESTS: u32 = 1;
const DEFAULT_MAX_GUESTS: u32 = 10;
const MAX_RATING: u8 = 5;

/// A review as shown next to an experience
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    /// Review id
    pub id: String,
    /// Display name of the reviewer
    pub author: String,
    /// Star rating, `0..=5`
    pub rating: u8,
    /// Review text, possibly empty
    pub comment: String,
    /// Creation timestamp as sent by the backend
    pub created_at: Option<String>,
}

/// Normalize `GET /api/v1/experiences/{id}`
///
/// Accepts the experience object itself or one wrapped in `{"data": ...}`.
///
/// # Errors
///
/// - `ResponseParseFailed` if the payload is not an object
/// - `MissingField("id")` if it has no id
pub fn normalize_experience(raw: &Value) -> Result<ExperienceDetails, ApiError> {
    let object = unwrap_data(raw);
    if !object.is_object() {
        return Err(ApiError::ResponseParseFailed(
            "experience payload is not an object".to_string(),
        ));
    }

    let id = first_string(object, &["id", "experience_id", "experienceId"])
        .ok_or(ApiError::MissingField("id"))?;
    let name = first_string(object, &["name", "title"]).unwrap_or_default();
    let base_price = first_money(object, &["price", "base_price", "basePrice"]).unwrap_or(Money::ZERO);
    let min_guests = first_u32(object, &["min_guests", "minGuests"])
        .unwrap_or(DEFAULT_MIN_GUESTS)
        .max(1);
    let max_guests = first_u32(object, &["max_guests", "maxGuests"])
        .unwrap_or(DEFAULT_MAX_GUESTS)
        .max(min_guests);
    let availability = first_array(object, &["availability", "time_slots", "timeSlots"])
        .map(|slots| slots.iter().filter_map(scalar_to_string).collect())
        .unwrap_or_default();

    Ok(ExperienceDetails {
        id: ExperienceId::new(id),
        name,
        base_price,
        min_guests,
        max_guests,
        availability,
    })
}

/// Normalize `GET /api/v1/experiences/{id}/reviews`
///
/// Accepts a bare array, `{"reviews": [...]}` or `{"data": [...]}`. Entries
/// without an id are skipped; anything unusable yields an empty list.
#[must_use]
pub fn normalize_reviews(raw: &Value) -> Vec<ReviewSummary> {
    let entries = match raw {
        Value::Array(entries) => Some(entries),
        other => first_array(other, &["reviews", "data"]),
    };

    entries
        .into_iter()
        .flatten()
        .filter_map(|entry| {
            let id = first_string(entry, &["id"])?;
            let author = first_string(entry, &["author", "user_name", "userName", "reviewer"])
                .filter(|author| !author.trim().is_empty())
                .unwrap_or_else(|| "Anonymous".to_string());
            let rating = first_f64(entry, &["rating", "stars"]).map_or(0, clamp_rating);
            let comment = first_string(entry, &["comment", "content", "text"]).unwrap_or_default();
            let created_at = first_string(entry, &["created_at", "createdAt"]);
            Some(ReviewSummary {
                id,
                author,
                rating,
                comment,
                created_at,
            })
        })
        .collect()
}

fn unwrap_data(raw: &Value) -> &Value {
    match raw.get("data") {
        Some(inner) if inner.is_object() => inner,
        _ => raw,
    }
}

fn first<'a>(object: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_string(object: &Value, keys: &[&str]) -> Option<String> {
    first(object, keys).and_then(scalar_to_string)
}

fn first_f64(object: &Value, keys: &[&str]) -> Option<f64> {
    match first(object, keys)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn first_u32(object: &Value, keys: &[&str]) -> Option<u32> {
    first_f64(object, keys)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| saturating_u32(n.min(f64::from(u32::MAX))))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Callers keep n in range
fn saturating_u32(n: f64) -> u32 {
    n as u32
}

fn first_money(object: &Value, keys: &[&str]) -> Option<Money> {
    first_f64(object, keys).and_then(Money::from_decimal)
}

fn first_array<'a>(object: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    first(object, keys).and_then(Value::as_array)
}

fn clamp_rating(rating: f64) -> u8 {
    if !rating.is_finite() || rating <= 0.0 {
        return 0;
    }
    let rounded = saturating_u32(rating.round().min(f64::from(MAX_RATING)));
    u8::try_from(rounded).unwrap_or(MAX_RATING)
}
