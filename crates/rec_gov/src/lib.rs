//! # RecGov
//!
//! This crate provides a client for the Recreation.gov APIs: the RIDB facility directory,
//! used to search for campgrounds, and the month-granularity campground availability API.

/// HTTP client for the facility directory and availability services.
mod client;
pub use client::*;

/// Error type for Recreation.gov requests, classified by upstream status code.
mod error;
pub use error::*;

/// Response and request types shared by both services.
mod types;
pub use types::*;

/// US state codes used for browsing campgrounds by state.
mod states;
pub use states::*;
