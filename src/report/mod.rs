//! Report generation.

pub mod message;

pub use message::{format_report, ReportOptions};
