//! mezzwatch - Watch-folder automation for Dolby Vision Profile 7 encoding
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod encoder;
pub mod error;
pub mod tools;
pub mod watch;

pub use error::{Error, Result};
