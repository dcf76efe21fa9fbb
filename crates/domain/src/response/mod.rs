//! Response types.

mod outcome;

pub use outcome::{ApiResponse, HttpOutcome};
