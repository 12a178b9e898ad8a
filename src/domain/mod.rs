//! Domain layer: core entities and business rules.

pub mod catalog;
pub mod counts;
pub mod events;
pub mod export;
pub mod reply;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
