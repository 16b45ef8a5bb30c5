//! HTTP implementation of the booking collaborators

use crate::api::catalog::{ReviewSummary, normalize_experience, normalize_reviews};
use crate::api::payloads::{CreateBookingRequest, NotificationRequest};
use crate::api::{ApiError, ApiFuture, BookingApi, NotificationApi};
use crate::types::{BookingConfirmation, ExperienceDetails, ExperienceId};
use reqwest::{Client, Response};
use serde_json::Value;

/// Marketplace backend client
///
/// No request timeout is configured: a booking call runs until it resolves
/// or the effect that issued it is cancelled.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a client for the backend at `base_url` (e.g. `http://localhost:3000`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// The backend base URL, without trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `POST /api/bookings`
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, non-2xx statuses, or a success
    /// body without a `reference`.
    pub async fn submit_booking(
        &self,
        request: &CreateBookingRequest,
    ) -> Result<BookingConfirmation, ApiError> {
        let response = self
            .client
            .post(self.url("/api/bookings"))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        let body = read_json(response).await?;
        if body.get("reference").is_none_or(Value::is_null) {
            return Err(ApiError::MissingField("reference"));
        }
        serde_json::from_value(body).map_err(|e| ApiError::ResponseParseFailed(e.to_string()))
    }

    /// `POST /api/notifications`; the response body is ignored
    ///
    /// # Errors
    ///
    /// Returns errors for network failures or non-2xx statuses.
    pub async fn publish_notification(&self, request: &NotificationRequest) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/api/notifications"))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        ensure_success(response).await.map(drop)
    }

    /// `GET /api/v1/experiences/{id}`
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, non-2xx statuses, or a payload
    /// that cannot be normalized.
    pub async fn fetch_experience(&self, id: &ExperienceId) -> Result<ExperienceDetails, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/v1/experiences/{id}")))
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        normalize_experience(&read_json(response).await?)
    }

    /// `GET /api/v1/experiences/{id}/reviews`
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, non-2xx statuses, or a body that
    /// is not JSON.
    pub async fn fetch_reviews(&self, id: &ExperienceId) -> Result<Vec<ReviewSummary>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/v1/experiences/{id}/reviews")))
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        Ok(normalize_reviews(&read_json(response).await?))
    }
}

async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn read_json(response: Response) -> Result<Value, ApiError> {
    ensure_success(response)
        .await?
        .json::<Value>()
        .await
        .map_err(|e| ApiError::ResponseParseFailed(e.to_string()))
}

impl BookingApi for HttpClient {
    fn create_booking(&self, request: CreateBookingRequest) -> ApiFuture<'_, BookingConfirmation> {
        Box::pin(async move { self.submit_booking(&request).await })
    }
}

impl NotificationApi for HttpClient {
    fn create_notification(&self, request: NotificationRequest) -> ApiFuture<'_, ()> {
        Box::pin(async move { self.publish_notification(&request).await })
    }
}
