//! Nimbus — cloud environment definition mapper.
//!
//! Validates declarative service definitions, maps them into execution
//! messages for an orchestrator (and back), folds in provider data from the
//! previous apply and detects which resources changed.

pub mod cli;
pub mod core;
pub mod error;
pub mod resources;

pub use crate::core::definition::{Definition, Payload};
pub use crate::core::mapper::{convert_message, convert_payload};
pub use crate::core::merge::merge_provider_data;
pub use crate::core::message::{ExecutionMessage, ResourceItem};
pub use crate::core::validator::{validate, validate_all, ValidationError};
pub use crate::error::{Error, Result};
