//! Guided finance wizard
//!
//! [`WizardState`] is the pure state machine; [`WizardSession`] binds it to a
//! catalog snapshot and supplies the options for each step.

mod session;
mod state;

pub use session::{StepOptions, WizardSession, WizardSnapshot};
pub use state::{
    Choice, FinanceState, IgnoredTransition, PaymentMethod, ResolvedSelection, Selections, Step,
    WizardState,
};
