//! Shared foundation types used across the domain.

mod ids;

pub use ids::SessionId;
