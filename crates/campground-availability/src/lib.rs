//! # Campground Availability
//!
//! This crate checks campsite availability for a campground over a date range.
//! It plans the calendar months a range touches, fetches one availability payload
//! per month, merges the per-site maps and derives a summary with a booking link.

/// Types for availability searches
mod availability_types;
pub use availability_types::*;

/// Calendar months covered by a date range
mod month_plan;
pub use month_plan::*;

/// Month fetching and per-site merging
mod aggregator;
pub use aggregator::*;

/// Available/total counts and booking link
mod summary;
pub use summary::*;

/// Current-result slot with stale search protection
mod search_session;
pub use search_session::*;

/// Debounced search-as-you-type for picking a campground
mod autocomplete;
pub use autocomplete::*;
