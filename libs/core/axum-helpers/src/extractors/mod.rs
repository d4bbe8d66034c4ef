//! Custom extractors for Axum handlers.
//!
//! Both reject with the shared error body so handlers only see valid input.

pub mod id_path;
pub mod validated_json;

pub use id_path::IdPath;
pub use validated_json::ValidatedJson;
