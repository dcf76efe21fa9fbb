//! Response testing and run accounting.
//!
//! This module provides the assertion model evaluated inside check
//! procedures, the pass/fail outcome of a check, and the tally that
//! accumulates outcomes over a run.

mod assertion;
mod case;
mod check;
mod tally;

pub use assertion::{
    Assertion, AssertionResult, Expectation, Severity, StatusExpectation, verify,
};
pub use case::CaseDefinition;
pub use check::{CheckFailure, CheckOutcome, CheckPass};
pub use tally::{CaseReport, CaseStatus, TestTally};
