//! CLI command implementations

pub mod blueprint;
pub mod export;
pub mod json_output;
pub mod template;
pub mod validate;

mod reporting;
