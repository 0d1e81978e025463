use chrono::NaiveDate;
use serde::Serialize;

use crate::availability_types::{AggregatedAvailability, AvailabilityResults};

/// Booking page for a campground on recreation.gov
pub const BOOKING_BASE_URL: &str = "https://www.recreation.gov/camping/campgrounds";

/// Which of the completed-search outcomes applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    /// At least one site has an open date
    HasAvailable,
    /// Sites exist but none has an open date
    FullyBooked,
    /// The campground returned no sites for the range
    NoSiteData,
}

/// Presentation data derived from a completed search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilitySummary {
    /// Sites with at least one available date
    pub available_count: usize,
    /// Sites reported across all months
    pub total_count: usize,
    /// IDs of the available sites, sorted
    pub available_site_ids: Vec<String>,
    /// recreation.gov booking page for the campground and start date
    pub booking_url: String,
    /// Overall outcome
    pub status: AvailabilityStatus,
}

impl AvailabilitySummary {
    /// One-line message for the result banner
    pub fn headline(&self) -> String {
        match self.status {
            AvailabilityStatus::HasAvailable => format!(
                "We found {} available {} for your dates.",
                self.available_count,
                if self.available_count == 1 { "site" } else { "sites" }
            ),
            AvailabilityStatus::FullyBooked => format!(
                "All {} sites are reserved for your selected dates. Try different dates or check back later for cancellations.",
                self.total_count
            ),
            AvailabilityStatus::NoSiteData => "No campsites found for this date range.".to_string(),
        }
    }
}

/// Summarizes a completed search.
///
/// A site counts as available when any of its dates is `"Available"`.
pub fn derive_summary(results: &AvailabilityResults) -> AvailabilitySummary {
    let available_site_ids = available_site_ids(&results.data);
    let available_count = available_site_ids.len();
    let total_count = results.data.len();

    let status = if total_count == 0 {
        AvailabilityStatus::NoSiteData
    } else if available_count == 0 {
        AvailabilityStatus::FullyBooked
    } else {
        AvailabilityStatus::HasAvailable
    };

    AvailabilitySummary {
        available_count,
        total_count,
        available_site_ids,
        booking_url: booking_url(&results.campground_id, results.start_date),
        status,
    }
}

/// IDs of sites with at least one open date, in site ID order
pub fn available_site_ids(aggregated: &AggregatedAvailability) -> Vec<String> {
    aggregated
        .sites()
        .filter(|site| site.has_availability())
        .map(|site| site.site_id.clone())
        .collect()
}

/// Deep link to the campground's booking page, opened at `start_date`
pub fn booking_url(campground_id: &str, start_date: NaiveDate) -> String {
    format!(
        "{}/{}?date={}",
        BOOKING_BASE_URL,
        urlencoding::encode(campground_id),
        start_date.format("%Y-%m-%d")
    )
}
