//! Model inference: prompt contract, client, and response validation.
//!
//! One call to [`InferenceProvider::infer`] is one bounded-timeout request
//! to one named model. Everything a response must satisfy before the rest of
//! the pipeline may trust it is enforced in [`validate_response`], the
//! single seam between untrusted model output and the typed domain.

pub mod client;
pub mod prompt;
pub mod response;

pub use client::{ChatCompletionsClient, InferenceProvider};
pub use response::validate_response;
