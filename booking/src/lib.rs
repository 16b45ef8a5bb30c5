//! # Booking
//!
//! Multi-step booking wizard for the experience marketplace.
//!
//! - [`types`]: draft, money and confirmation types
//! - [`validation`]: pure field validators
//! - [`pricing`]: subtotal, service fee, taxes and total
//! - [`wizard`]: the step state machine (a reducer) and its view contract
//! - [`api`]: the REST collaborators the wizard calls, plus test doubles
//! - [`config`]: environment-driven configuration
//!
//! ## Example
//!
//! ```no_run
//! use booking::api::HttpClient;
//! use booking::types::{ExperienceDetails, ExperienceId, Money};
//! use booking::wizard::{WizardAction, WizardEnvironment, WizardReducer, WizardState};
//! use marketplace_core::environment::SystemClock;
//! use marketplace_runtime::Store;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(HttpClient::new("http://localhost:3000"));
//! let experience = ExperienceDetails {
//!     id: ExperienceId::new("exp-1"),
//!     name: "Sunset Kayak Tour".to_string(),
//!     base_price: Money::from_units(100),
//!     min_guests: 1,
//!     max_guests: 6,
//!     availability: vec!["09:00".to_string()],
//! };
//! let store = Store::new(
//!     WizardState::new(experience),
//!     WizardReducer::new(),
//!     WizardEnvironment::new(SystemClock, client.clone(), client),
//! );
//! store.send(WizardAction::SelectTime("09:00".to_string())).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod pricing;
pub mod types;
pub mod validation;
pub mod wizard;

pub use config::{Config, ConfigError};
pub use pricing::{PriceBreakdown, compute_total};
pub use types::{
    BookingConfirmation, BookingDraft, ExperienceDetails, ExperienceId, GuestInfo, Money,
    PaymentInfo, WizardStep,
};
pub use validation::{ValidationFailure, ValidationResult};
