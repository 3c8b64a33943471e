//! Extractors that reject with the shared [`AppError`](crate::errors::AppError) body.

pub mod validated_json;

pub use validated_json::ValidatedJson;
