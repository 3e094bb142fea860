//! Typed storefront surface over `ApiClient`.
//!
//! `endpoints.rs` names the routes, `models.rs` the resource shapes; `plans.rs`
//! and `auth.rs` wrap the calls the storefront pages make most.

pub mod auth;
pub mod endpoints;
pub mod models;
pub mod plans;

pub use auth::{AuthApi, RegisterData};
pub use plans::{PlanFilters, PlansApi, SortBy, SortOrder};
