/*
 * This module provides the application logic layer, centered around the
 * `runner` module which drives a complete extraction run (input validation,
 * sample eligibility, path classification and export packaging).
 * Unit tests for the runner are in `runner_tests.rs`.
 */
pub mod runner;


pub use runner::{RunError, RunOutcome, execute};
