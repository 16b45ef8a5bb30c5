//! Four-step booking wizard: date & time, guest details, review & payment,
//! confirmation.
//!
//! The wizard is a [`Reducer`](marketplace_core::reducer::Reducer): run it in
//! a `marketplace_runtime::Store`, send [`WizardAction`]s, and read the
//! active step back with [`view::render`].

pub mod actions;
pub mod environment;
pub mod reducer;
pub mod state;
pub mod view;

pub use actions::{Field, GuestField, PaymentField, WizardAction};
pub use environment::WizardEnvironment;
pub use reducer::{SUBMISSION, WizardReducer};
pub use state::{ConsentPolicy, SUBMISSION_FAILED_MESSAGE, WizardState};
pub use view::{StepView, render};
