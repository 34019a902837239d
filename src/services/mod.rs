//! Business logic services.

pub mod dashboard;
pub mod documents;
pub mod search;
