//! Query dispatch to the conversational AI platforms.
//!
//! This module provides the per-platform wire formats and the sequential
//! dispatcher that asks every platform every prompt.

pub mod dispatcher;
pub mod wire;

pub use dispatcher::{DispatchSettings, Dispatcher, PlatformResults};
