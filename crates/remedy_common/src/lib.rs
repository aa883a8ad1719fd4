//! Shared data model for the Remedy diagnosis engine.
//!
//! Everything here is plain serde-serializable data: the inputs the engine
//! consumes (system profile, recipe, failure context, escalation chain) and
//! the response shape it produces. No decision logic lives in this crate —
//! that belongs to `remedy_engine`.

pub mod chain;
pub mod legacy;
pub mod option;
pub mod profile;
pub mod recipe;
pub mod response;

pub use chain::{Breadcrumb, Chain, ChainContext, MAX_CHAIN_DEPTH};
pub use legacy::{LegacyOption, LegacyRemediation};
pub use option::{
    Availability, CollectedOption, EvaluatedOption, Layer, PackageMap, RemediationOption, Risk,
    StrategySpec,
};
pub use profile::{Capabilities, ContainerInfo, DistroInfo, PackageManagers, SystemProfile};
pub use recipe::Recipe;
pub use response::{
    cap_stderr, fallback_actions, FailureContext, FailureSummary, FallbackAction,
    RemediationResponse, STDERR_CAP,
};
