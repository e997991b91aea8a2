//! Excursion core library — domain types, the in-memory registry, errors,
//! and front-end configuration.
//!
//! Public API surface:
//! - [`types`] — locations, activity types, operators, activities, reviews
//! - [`registry`] — [`Registry`] and its operations
//! - [`options`] — positional review option lists
//! - [`tally`] — singular/plural count headers
//! - [`error`] — [`RegistryError`], [`ConfigError`]
//! - [`config`] — `~/.excursion/config.yaml`

pub mod config;
pub mod error;
pub mod options;
pub mod registry;
pub mod tally;
pub mod types;

pub use config::ExcursionConfig;
pub use error::{ConfigError, Noun, RegistryError};
pub use registry::{ActivityMatch, LocationHighlight, Registry, ResolutionReceipt, ReviewReceipt};
pub use tally::Tally;
pub use types::{
    Activity, ActivityId, ActivityType, Location, Operator, OperatorId, PrivateStatus, Rating,
    Resolution, Review, ReviewDetail, ReviewId, ReviewKind,
};
