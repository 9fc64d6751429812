//! Lookup adapters for service requirements and traffic violations.

mod json_service_catalog;
mod violation_registry;

pub use json_service_catalog::{CatalogLoadError, JsonServiceCatalog};
pub use violation_registry::InMemoryViolationRegistry;
