//! Benefit eligibility screening: a six-step questionnaire feeding a fixed set of
//! eligibility predicates evaluated against a catalog of benefit programs.

pub mod config;
pub mod error;
pub mod screening;
pub mod telemetry;
