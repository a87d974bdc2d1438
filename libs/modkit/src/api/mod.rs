//! HTTP-facing helpers shared by modules.

pub mod problem;

pub use problem::{Problem, ProblemResponse, ValidationError, APPLICATION_PROBLEM_JSON};
