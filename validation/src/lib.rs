//! # Validation
//!
//! Building blocks shared by validators: the [`ValidationResult`] handed back
//! to callers, [`ValidationOptions`] carrying per-error message templates and
//! value obscuring, and the [`Merge`] trait used to layer partial
//! configuration over defaults.
//!
//! Untyped input (JSON, TOML) is checked against declared property types with
//! the helpers in [`props`] before it is turned into typed options.

#![warn(clippy::all)]
#![warn(clippy::correctness)]
#![warn(clippy::style)]
#![warn(clippy::complexity)]
#![warn(clippy::perf)]

mod merge;
mod message;
mod options;
pub mod props;
mod result;

pub use crate::merge::Merge;
pub use crate::message::{get_error_message_by_key, MessageKey, MessageTemplate, TemplateFn};
pub use crate::options::{
    default_value_obscurator, to_validation_options, MessageTemplates, Obscurator,
    PartialValidationOptions, ValidationOptions,
};
pub use crate::props::{PropType, TypeError};
pub use crate::result::{to_validation_result, ValidationResult};
