//! HTTP client against a mock marketplace backend

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

mod common;

use booking::api::payloads::NotificationKind;
use booking::api::{ApiError, BookingApi, CreateBookingRequest, HttpClient, NotificationApi, NotificationRequest};
use booking::types::{ExperienceId, Money, WizardStep};
use common::filled_state;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn booking_request() -> CreateBookingRequest {
    let state = filled_state(WizardStep::ReviewPayment);
    CreateBookingRequest::from_draft(&state.draft, state.pricing().total).unwrap()
}

#[tokio::test]
async fn test_create_booking_sends_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/bookings"))
        .and(body_partial_json(json!({
            "experienceId": "exp-kayak",
            "date": "2025-07-04",
            "time": "17:30",
            "guests": 3,
            "guestInfo": {"firstName": "Ada", "email": "ada@example.com"},
            "paymentInfo": {"cardNumber": "4242 4242 4242 4242", "saveCard": false, "amount": 354},
            "specialRequests": "",
            "totalPrice": 354,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 981,
            "reference": "BK-981",
            "status": "confirmed",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(server.uri());
    let confirmation = client.create_booking(booking_request()).await.unwrap();

    assert_eq!(confirmation.reference, "BK-981");
    assert_eq!(confirmation.id.as_deref(), Some("981"));
    assert_eq!(confirmation.extra.get("status"), Some(&json!("confirmed")));
    assert_eq!(confirmation.action_url(), "/bookings/981");
}

#[tokio::test]
async fn test_create_booking_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/bookings"))
        .respond_with(ResponseTemplate::new(422).set_body_string("card declined"))
        .mount(&server)
        .await;

    let error = HttpClient::new(server.uri())
        .create_booking(booking_request())
        .await
        .unwrap_err();

    assert_eq!(
        error,
        ApiError::Status {
            status: 422,
            message: "card declined".to_string()
        }
    );
    assert!(error.is_rejection());
}

#[tokio::test]
async fn test_success_without_reference_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1"})))
        .mount(&server)
        .await;

    let error = HttpClient::new(server.uri())
        .create_booking(booking_request())
        .await
        .unwrap_err();
    assert_eq!(error, ApiError::MissingField("reference"));
}

#[tokio::test]
async fn test_non_json_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let error = HttpClient::new(server.uri())
        .create_booking(booking_request())
        .await
        .unwrap_err();
    assert!(matches!(error, ApiError::ResponseParseFailed(_)));
}

#[tokio::test]
async fn test_unreachable_backend() {
    // Bind then release a port so nothing listens on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let error = HttpClient::new(format!("http://127.0.0.1:{port}"))
        .create_booking(booking_request())
        .await
        .unwrap_err();
    assert!(matches!(error, ApiError::RequestFailed(_)));
}

#[tokio::test]
async fn test_notification_body_and_ignored_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/notifications"))
        .and(body_partial_json(json!({
            "type": "booking",
            "title": "Booking Confirmed!",
            "actionUrl": "/bookings/981",
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let request = NotificationRequest {
        kind: NotificationKind::Booking,
        title: "Booking Confirmed!".to_string(),
        message: "Your booking is confirmed.".to_string(),
        action_url: "/bookings/981".to_string(),
    };
    HttpClient::new(server.uri())
        .create_notification(request)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_notification_failure_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/notifications"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let request = NotificationRequest {
        kind: NotificationKind::Booking,
        title: "t".to_string(),
        message: "m".to_string(),
        action_url: "/bookings".to_string(),
    };
    let error = HttpClient::new(server.uri())
        .create_notification(request)
        .await
        .unwrap_err();
    assert!(matches!(error, ApiError::Status { status: 500, .. }));
    assert!(!error.is_rejection());
}

#[tokio::test]
async fn test_fetch_experience_and_reviews() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/experiences/exp-kayak"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "exp-kayak",
                "title": "Sunset Kayak Tour",
                "price": 89.5,
                "min_guests": 2,
                "maxGuests": 8,
                "availability": ["09:00", "17:30"],
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/experiences/exp-kayak/reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "r1", "author": "Lin", "rating": 5, "comment": "Magical"},
            {"rating": 1},
        ])))
        .mount(&server)
        .await;

    let client = HttpClient::new(server.uri());
    let id = ExperienceId::new("exp-kayak");

    let experience = client.fetch_experience(&id).await.unwrap();
    assert_eq!(experience.name, "Sunset Kayak Tour");
    assert_eq!(experience.base_price, Money::from_cents(8_950));
    assert_eq!(experience.guest_range(), 2..=8);

    let reviews = client.fetch_reviews(&id).await.unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].author, "Lin");
}

#[tokio::test]
async fn test_fetch_missing_experience() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/experiences/nope"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let error = HttpClient::new(server.uri())
        .fetch_experience(&ExperienceId::new("nope"))
        .await
        .unwrap_err();
    assert!(matches!(error, ApiError::Status { status: 404, .. }));
}
