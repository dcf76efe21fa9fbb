//! House Probe Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - The API tester and sequential test runner
//! - The built-in House-App smoke suite

pub mod error;
pub mod ports;
pub mod runner;
pub mod suite;
pub mod tester;

#[cfg(test)]
mod mock;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{Clock, HttpClient};
pub use runner::{CheckProcedure, RequestCheck, TestCase, TestRunner};
pub use suite::{SuiteSettings, house_app_definitions, house_app_suite};
pub use tester::{ApiTester, DEFAULT_BASE_URL};
