//! Switch the system DNS resolver between well-known public providers and
//! the servers that were in use before the first switch.

pub mod backend;
pub mod catalog;
pub mod config;
pub mod elevation;
pub mod error;
pub mod switcher;

pub use error::{Error, Result};
