//! Booking wizard demo.
//!
//! Drives one wizard through all four steps with scripted input and prints
//! each step as it is rendered. Talks to the backend at
//! `BOOKING_API_BASE_URL` when `BOOKING_EXPERIENCE_ID` names an experience it
//! can load; otherwise runs offline against in-memory collaborators whose
//! first booking attempt fails, to show the retry path.

use booking::api::mock::{RecordingNotificationApi, ScriptedBookingApi};
use booking::api::{ApiError, BookingApi, HttpClient, NotificationApi};
use booking::config::{Config, DEFAULT_LOG_FILTER};
use booking::types::{ExperienceDetails, ExperienceId, Money};
use booking::wizard::{
    GuestField, PaymentField, StepView, WizardAction, WizardEnvironment, WizardReducer,
    WizardState, render,
};
use chrono::Days;
use marketplace_core::environment::{Clock, SystemClock};
use marketplace_runtime::Store;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type WizardStore = Store<WizardState, WizardAction, WizardEnvironment<SystemClock>, WizardReducer<SystemClock>>;

const RESULT_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Config::from_env();
    config.validate()?;
    info!(base_url = %config.api_base_url, require_terms = config.require_terms, "Configuration loaded");

    let client = Arc::new(HttpClient::new(config.api_base_url.clone()));
    let (experience, bookings, notifications) = match load_experience(&client, &config).await {
        Ok(experience) => {
            info!(experience = %experience.id, "Using live backend");
            let bookings: Arc<dyn BookingApi> = client.clone();
            let notifications: Arc<dyn NotificationApi> = client;
            (experience, bookings, notifications)
        },
        Err(error) => {
            warn!(%error, "Backend unavailable, running offline");
            let bookings: Arc<dyn BookingApi> = Arc::new(ScriptedBookingApi::with_outcomes([Err(
                ApiError::Status {
                    status: 503,
                    message: "payment provider unavailable".to_string(),
                },
            )]));
            let notifications: Arc<dyn NotificationApi> = Arc::new(RecordingNotificationApi::new());
            (sample_experience(), bookings, notifications)
        },
    };

    let store: WizardStore = Store::new(
        WizardState::new(experience.clone()).with_consent_policy(config.consent_policy()),
        WizardReducer::new(),
        WizardEnvironment::new(SystemClock, bookings, notifications),
    );

    // Step 1
    print_step(&store).await;
    let date = SystemClock
        .now()
        .date_naive()
        .checked_add_days(Days::new(7))
        .ok_or("date out of range")?;
    store.send(WizardAction::SelectDate(date)).await?;
    if let Some(slot) = experience.availability.first() {
        store.send(WizardAction::SelectTime(slot.clone())).await?;
    }
    store.send(WizardAction::SetGuestCount(2)).await?;
    store
        .send(WizardAction::SetSpecialRequests("Window seats if possible".to_string()))
        .await?;
    store.send(WizardAction::GoNext).await?;

    // Step 2
    print_step(&store).await;
    for (field, value) in [
        (GuestField::FirstName, "Ada"),
        (GuestField::LastName, "Lovelace"),
        (GuestField::Email, "ada@example.com"),
        (GuestField::Phone, "+44 20 7946 0958"),
    ] {
        store
            .send(WizardAction::SetGuestField(field, value.to_string()))
            .await?;
    }
    store.send(WizardAction::GoNext).await?;

    // Step 3
    print_step(&store).await;
    for (field, value) in [
        (PaymentField::CardNumber, "4242 4242 4242 4242"),
        (PaymentField::ExpiryDate, "08/29"),
        (PaymentField::Cvv, "123"),
        (PaymentField::NameOnCard, "Ada Lovelace"),
    ] {
        store
            .send(WizardAction::SetPaymentField(field, value.to_string()))
            .await?;
    }
    store.send(WizardAction::SetTermsAccepted(true)).await?;

    for attempt in 1..=2 {
        let outcome = store
            .send_and_wait_for(WizardAction::Submit, is_submission_result, RESULT_TIMEOUT)
            .await?;
        if let WizardAction::BookingFailed { error } = outcome {
            warn!(attempt, %error, "Booking attempt failed");
            print_step(&store).await;
            continue;
        }
        break;
    }

    // Step 4
    print_step(&store).await;

    store.shutdown(config.shutdown_timeout()).await?;
    Ok(())
}

async fn load_experience(client: &HttpClient, config: &Config) -> Result<ExperienceDetails, ApiError> {
    let Some(id) = config.experience_id.as_deref() else {
        return Err(ApiError::RequestFailed("BOOKING_EXPERIENCE_ID not set".to_string()));
    };
    let id = ExperienceId::new(id);
    let experience = client.fetch_experience(&id).await?;
    match client.fetch_reviews(&id).await {
        Ok(reviews) => info!(count = reviews.len(), "Reviews loaded"),
        Err(error) => warn!(%error, "Reviews unavailable"),
    }
    Ok(experience)
}

fn sample_experience() -> ExperienceDetails {
    ExperienceDetails {
        id: ExperienceId::new("sample-sunset-kayak"),
        name: "Sunset Kayak Tour".to_string(),
        base_price: Money::from_units(100),
        min_guests: 1,
        max_guests: 8,
        availability: vec!["09:00".to_string(), "17:30".to_string()],
    }
}

fn is_submission_result(action: &WizardAction) -> bool {
    matches!(
        action,
        WizardAction::BookingConfirmed(_) | WizardAction::BookingFailed { .. }
    )
}

async fn print_step(store: &WizardStore) {
    let view = store.state(render).await;
    print_view(&view);
}

fn print_view(view: &StepView) {
    println!();
    println!("=== Step {}/4: {} ===", view.step_number, view.title);
    for field in &view.fields {
        let marker = if field.required { "*" } else { " " };
        let error = field.error.as_deref().map(|e| format!("  <- {e}")).unwrap_or_default();
        println!("  {marker} {:<22} {}{error}", field.label, field.value);
    }
    for checkbox in &view.checkboxes {
        let mark = if checkbox.checked { "x" } else { " " };
        println!("  [{mark}] {}", checkbox.label);
    }
    if !view.guest_options.is_empty() {
        println!("  Guests: {} (options {:?})", view.guest_count, view.guest_options);
    }
    if let Some(summary) = &view.summary {
        println!(
            "  {} on {} at {} for {} ({})",
            summary.experience, summary.date, summary.time, summary.guests, summary.guest_name
        );
    }
    for line in &view.price_summary.lines {
        println!("    {:<28} {}", line.label, line.amount);
    }
    println!("    {:<28} {}", "Total", view.price_summary.total);
    if let Some(error) = &view.submission_error {
        println!("  ! {error}");
    }
    if let Some(reference) = &view.confirmation_reference {
        println!("  Confirmation reference: {reference}");
    }
    if let Some(action) = &view.primary_action {
        let state = if action.enabled { "enabled" } else { "disabled" };
        println!("  [{}] ({state})", action.label);
    }
}
