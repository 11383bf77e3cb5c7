//! Carwise core library exports
//!
//! The guided vehicle-selection wizard and everything it consumes: the
//! catalog client with its fallback chain, the offline seed, facet
//! normalization, selection matching and the wizard state machine.

pub mod banks;
pub mod catalog;
pub mod config;
pub mod error;
pub mod matcher;
pub mod presenter;
pub mod wizard;

pub use banks::{Bank, BANKS};
pub use catalog::{
    Brand, CatalogClient, CatalogEvent, CatalogSnapshot, CatalogSource, ModelYear, VehicleRecord,
};
pub use config::CatalogConfig;
pub use error::{CatalogError, ConfigError};
pub use matcher::{match_vehicle, MatchCriteria};
pub use presenter::ResultView;
pub use wizard::{
    Choice, PaymentMethod, ResolvedSelection, Step, StepOptions, WizardSession, WizardSnapshot,
    WizardState,
};
