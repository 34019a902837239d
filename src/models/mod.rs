//! Stored documents, API payloads and the helpers that read them defensively.

pub mod creation_date;
pub mod document;
pub mod measure;
pub mod pagination;
pub mod record_id;
pub mod sensor;
pub mod user;
