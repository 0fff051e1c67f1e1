//! Shared Kernel - Request-boundary core
//!
//! This crate contains the vocabulary every module speaks at the request
//! boundary:
//! - Error taxonomy ([`error::app_error::AppError`], [`error::code::ErrorCode`])
//! - Field validation (rules, schemas, the [`validation::engine::Validator`])
//! - The response envelope ([`response`])
//! - Typed ID wrappers
//!
//! **Design Principle**: nothing here performs I/O or holds mutable shared
//! state; everything can be used from any number of request tasks at once.

pub mod error {
    pub mod app_error;
    pub mod code;
    pub mod conversions;
}
pub mod id;
pub mod response;
pub mod validation {
    pub mod engine;
    pub mod message;
    pub mod naming;
    pub mod rules;
    pub mod schema;
}

pub use error::app_error::{AppError, AppResult};
pub use error::code::ErrorCode;
