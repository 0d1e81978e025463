use campground_availability::{AvailabilityResults, AvailabilitySummary};
use rec_gov::SearchResultItem;
use serde::{Deserialize, Serialize};

/// Query string for the facility search endpoint
#[derive(Debug, Deserialize)]
pub struct FacilitySearchQuery {
    /// Text typed into the campground box
    pub q: Option<String>,
}

/// Query string for the popular campgrounds endpoint
#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    /// Maximum number of campgrounds (default: 20)
    pub limit: Option<usize>,
}

/// Response structure for campground lists
#[derive(Debug, Serialize)]
pub struct FacilitySearchResponse {
    /// Matching campgrounds
    pub results: Vec<SearchResultItem>,
    /// Number of campgrounds returned
    pub total: usize,
    /// Hint shown when nothing matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FacilitySearchResponse {
    /// Wraps a result list, attaching `empty_hint` when it is empty
    pub fn new(results: Vec<SearchResultItem>, empty_hint: &str) -> Self {
        let message = results.is_empty().then(|| empty_hint.to_string());
        Self {
            total: results.len(),
            results,
            message,
        }
    }
}

/// Response structure for an availability check
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    /// Query echo and merged per-site availability
    pub results: AvailabilityResults,
    /// Counts, booking link and outcome
    pub summary: AvailabilitySummary,
    /// Banner text for the outcome
    pub message: String,
}
