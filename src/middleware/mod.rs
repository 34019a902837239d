//! Request extractors shared by the route handlers.

pub mod query_params;
pub mod validated_json;
