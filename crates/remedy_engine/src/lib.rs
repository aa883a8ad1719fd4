//! Remedy engine - diagnoses failed tool installs and ranks remediations.
//!
//! The pipeline for one failed install step:
//! cascade over the handler catalog -> availability evaluation against the
//! system profile -> sorted, annotated response. Fully synchronous; the
//! only I/O is a PATH-existence check behind [`locator::BinaryLocator`].

pub mod cascade;
pub mod catalog;
pub mod evaluate;
pub mod locator;
pub mod matcher;
pub mod recipes;
pub mod resolver;
pub mod respond;

pub use catalog::{catalog, CatalogError, FailureHandler, HandlerCatalog};
pub use locator::{BinaryLocator, StaticLocator, SystemLocator};
pub use recipes::{EmptyRecipes, RecipeStore, StaticRecipes};
pub use resolver::{Confidence, DependencyResolution, DependencyStatus, ResolutionSource};
pub use respond::{assemble, build_response};
