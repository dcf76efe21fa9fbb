//! House Probe Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading
//! and run reporting.

pub mod adapters;
pub mod config;
pub mod report;

pub use adapters::{ReqwestHttpClient, SystemClock};
pub use config::{ConfigError, ProbeConfig};
pub use report::{ReportError, RunReport, render_summary, verdict, write_report};
