use std::collections::BTreeMap;
use std::fmt;

use actix_web::ResponseError;
use chrono::{Datelike, Days, NaiveDate};
use rec_gov::{AVAILABLE_STATUS, CampsiteAvailabilityData, MonthAvailabilityResponse, RecGovError};
use serde::{Deserialize, Serialize, Serializer};
use validator::Validate;

/// Inclusive range of calendar days for an availability search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, requiring `end` to be strictly after `start`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AvailabilityError> {
        if end <= start {
            return Err(AvailabilityError::InvalidDateRange);
        }
        Ok(Self { start, end })
    }

    /// First day of the range
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of nights between start and end
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// A calendar month, identified by its first day.
///
/// Displays as the availability API's `start_date` parameter,
/// e.g. `2024-07-01T00:00:00.000Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    /// The month containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date - Days::new(u64::from(date.day0())))
    }

    /// First day of the month
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// Calendar year
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Calendar month, 1-based
    pub fn month(&self) -> u32 {
        self.0.month()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&rec_gov::month_start_param(self.0))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Availability of one campsite across every fetched month
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiteAvailability {
    /// Campsite ID as reported by recreation.gov
    pub site_id: String,
    /// Date string to status string, e.g. `"2024-07-01T00:00:00Z" => "Reserved"`
    pub availabilities: BTreeMap<String, String>,
    /// Site label, e.g. `A01`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    /// Campsite type, e.g. `STANDARD NONELECTRIC`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campsite_type: Option<String>,
    /// Loop the site belongs to
    #[serde(rename = "loop", skip_serializing_if = "Option::is_none")]
    pub campsite_loop: Option<String>,
}

impl SiteAvailability {
    /// Builds a site record from one month's upstream payload
    pub fn from_campsite(site_id: String, data: CampsiteAvailabilityData) -> Self {
        Self {
            site_id,
            availabilities: data.availabilities,
            site_name: data.site,
            campsite_type: data.campsite_type,
            campsite_loop: data.campsite_loop,
        }
    }

    /// Whether at least one date is marked `"Available"`
    pub fn has_availability(&self) -> bool {
        self.availabilities
            .values()
            .any(|status| status == AVAILABLE_STATUS)
    }

    /// Dates marked `"Available"`, in date order
    pub fn available_dates(&self) -> impl Iterator<Item = &str> {
        self.availabilities
            .iter()
            .filter(|(_, status)| status.as_str() == AVAILABLE_STATUS)
            .map(|(date, _)| date.as_str())
    }
}

/// Per-site availability merged across all months of a search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AggregatedAvailability {
    sites: BTreeMap<String, SiteAvailability>,
}

impl AggregatedAvailability {
    /// Merges one month's payload into the aggregation.
    ///
    /// New sites are inserted as-is. For a known site the month's dates are
    /// unioned into its map; on a date collision the merged-in month wins.
    /// Conflicting site metadata resolves to the greatest value, so the
    /// result does not depend on the order months arrive in.
    pub fn merge_month(&mut self, month: MonthAvailabilityResponse) {
        for (site_id, data) in month.campsites {
            match self.sites.get_mut(&site_id) {
                Some(existing) => {
                    existing.availabilities.extend(data.availabilities);
                    existing.site_name = existing.site_name.take().max(data.site);
                    existing.campsite_type = existing.campsite_type.take().max(data.campsite_type);
                    existing.campsite_loop = existing.campsite_loop.take().max(data.campsite_loop);
                }
                None => {
                    let site = SiteAvailability::from_campsite(site_id.clone(), data);
                    self.sites.insert(site_id, site);
                }
            }
        }
    }

    /// Looks up a site by ID
    pub fn get(&self, site_id: &str) -> Option<&SiteAvailability> {
        self.sites.get(site_id)
    }

    /// All sites, ordered by site ID
    pub fn sites(&self) -> impl Iterator<Item = &SiteAvailability> {
        self.sites.values()
    }

    /// Number of distinct sites
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Whether no month returned any site
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

impl FromIterator<MonthAvailabilityResponse> for AggregatedAvailability {
    fn from_iter<I: IntoIterator<Item = MonthAvailabilityResponse>>(months: I) -> Self {
        let mut aggregated = Self::default();
        for month in months {
            aggregated.merge_month(month);
        }
        aggregated
    }
}

/// Request structure for an availability search
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AvailabilityRequest {
    /// ID of the campground to check (RIDB facility ID)
    #[validate(length(min = 1, message = "Campground ID is required"))]
    pub campground_id: String,

    /// First night of the stay
    pub start_date: NaiveDate,

    /// Last day of the stay
    pub end_date: NaiveDate,
}

impl AvailabilityRequest {
    /// Validated date range of the request
    pub fn date_range(&self) -> Result<DateRange, AvailabilityError> {
        DateRange::new(self.start_date, self.end_date)
    }
}

/// Completed availability search: the query echo plus the merged data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityResults {
    /// Campground that was searched
    pub campground_id: String,
    /// First night of the stay
    pub start_date: NaiveDate,
    /// Last day of the stay
    pub end_date: NaiveDate,
    /// Per-site availability across every fetched month
    pub data: AggregatedAvailability,
}

/// Custom error type for availability searches
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    /// Failure reported by recreation.gov, passed through unchanged
    #[error(transparent)]
    Upstream(#[from] RecGovError),

    /// End date not after start date
    #[error("End date must be after start date")]
    InvalidDateRange,

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// The range touches more months than one search may fetch
    #[error("Date range spans {months} months; search at most {max} months at a time")]
    RangeTooLong {
        /// Months touched by the requested range
        months: usize,
        /// Configured limit
        max: usize,
    },
}

impl ResponseError for AvailabilityError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            AvailabilityError::Upstream(e) => e.status_code(),
            AvailabilityError::InvalidDateRange
            | AvailabilityError::Validation(_)
            | AvailabilityError::RangeTooLong { .. } => {
                actix_web::http::StatusCode::BAD_REQUEST
            }
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            AvailabilityError::Upstream(e) => e.error_response(),
            AvailabilityError::InvalidDateRange => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "invalid_date_range",
                "message": self.to_string()
            })),
            AvailabilityError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_error",
                "message": msg
            })),
            AvailabilityError::RangeTooLong { .. } => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "range_too_long",
                "message": self.to_string()
            })),
        }
    }
}
