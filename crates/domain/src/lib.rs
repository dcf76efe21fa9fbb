//! House Probe Domain - Core types
//!
//! This crate defines the domain model for the House-App smoke tester.
//! All types here are pure Rust with no I/O dependencies.

mod duration_millis;

pub mod auth;
pub mod error;
pub mod feed;
pub mod notification;
pub mod request;
pub mod response;
pub mod testing;

pub use auth::{Credentials, extract_token};
pub use error::{DomainError, DomainResult};
pub use feed::{FeedEvent, LiveFeed};
pub use notification::{
    ClickAction, MatchStrategy, NotificationPayload, NotificationSpec, WindowClient, route_click,
};
pub use request::{ApiRequest, Header, Headers, HttpMethod};
pub use response::{ApiResponse, HttpOutcome};
pub use testing::{
    Assertion, AssertionResult, CaseDefinition, CaseReport, CaseStatus, CheckFailure,
    CheckOutcome, CheckPass, Expectation, Severity, StatusExpectation, TestTally, verify,
};
