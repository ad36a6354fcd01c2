//! Canonical task contract shared by taskrelay adaptors.
//!
//! Vendor-specific translation lives in `taskrelay-plugins`; this crate only
//! defines the types and seams both sides agree on.

pub mod api;
pub mod config;
pub mod error;
pub mod task;
pub mod transport;
