use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Facility type descriptions the directory uses for campgrounds.
pub const CAMPGROUND_TYPES: [&str; 2] = ["Campground", "Camping"];

/// Status string the availability API uses for a bookable site-night.
pub const AVAILABLE_STATUS: &str = "Available";

/// Treats an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Facility search response from the RIDB directory
#[derive(Debug, Deserialize)]
pub struct FacilityResponse {
    /// Facilities on this page of results
    #[serde(rename = "RECDATA", default, deserialize_with = "null_as_default")]
    pub rec_data: Vec<Facility>,
}

/// Facility record as returned by the RIDB directory
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Facility {
    /// RIDB facility ID
    #[serde(rename = "FacilityID")]
    pub facility_id: String,

    /// Display name
    #[serde(rename = "FacilityName", default)]
    pub facility_name: String,

    /// HTML description
    #[serde(rename = "FacilityDescription", default)]
    pub description: Option<String>,

    /// Facility type, e.g. `Campground`
    #[serde(rename = "FacilityTypeDescription", default)]
    pub type_description: Option<String>,

    /// Latitude
    #[serde(rename = "FacilityLatitude", default)]
    pub latitude: Option<f64>,

    /// Longitude
    #[serde(rename = "FacilityLongitude", default)]
    pub longitude: Option<f64>,

    /// Contact phone
    #[serde(rename = "FacilityPhone", default)]
    pub phone: Option<String>,

    /// Contact email
    #[serde(rename = "FacilityEmail", default)]
    pub email: Option<String>,

    /// Two-letter state code
    #[serde(rename = "AddressStateCode", default)]
    pub state_code: Option<String>,

    /// City
    #[serde(rename = "FacilityCity", default)]
    pub city: Option<String>,
}

impl Facility {
    /// Whether the directory classifies this facility as a campground
    pub fn is_campground(&self) -> bool {
        self.type_description
            .as_deref()
            .is_some_and(|t| CAMPGROUND_TYPES.contains(&t))
    }

    /// Normalized projection used by search results
    pub fn to_search_result(&self) -> SearchResultItem {
        SearchResultItem {
            id: self.facility_id.clone(),
            name: self.facility_name.clone(),
            state: self.state_code.clone(),
            city: self.city.clone(),
            facility_type: self.type_description.clone(),
            description: self.description.clone(),
        }
    }
}

/// A facility as presented to the UI layer
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SearchResultItem {
    /// Facility ID, used as the campground ID for availability lookups
    pub id: String,
    /// Display name
    pub name: String,
    /// Two-letter state code
    pub state: Option<String>,
    /// City, when the directory knows it
    pub city: Option<String>,
    /// Facility type description
    #[serde(rename = "type")]
    pub facility_type: Option<String>,
    /// Free-text description
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

/// Options for a free-text directory search
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Page size (default: 50)
    pub limit: u32,
    /// Records to skip
    pub offset: u32,
    /// Restrict to one state
    pub state: Option<String>,
    /// Restrict to one activity, e.g. `CAMPING`
    pub activity: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
            state: None,
            activity: None,
        }
    }
}

/// Geographic filter for campground browsing
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFilter {
    /// Center latitude
    pub latitude: f64,
    /// Center longitude
    pub longitude: f64,
    /// Radius in miles
    pub radius: f64,
}

impl GeoFilter {
    /// Creates a filter with the directory's default 25 mile radius
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius: 25.0,
        }
    }
}

/// Options for browsing camping facilities
#[derive(Debug, Clone)]
pub struct CampgroundOptions {
    /// Page size (default: 100)
    pub limit: u32,
    /// Records to skip
    pub offset: u32,
    /// Restrict to one state
    pub state: Option<String>,
    /// Restrict to a radius around a point
    pub near: Option<GeoFilter>,
}

impl Default for CampgroundOptions {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
            state: None,
            near: None,
        }
    }
}

/// Response structure from the month availability API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthAvailabilityResponse {
    /// Campsite ID to that site's month of data
    #[serde(default, deserialize_with = "null_as_default")]
    pub campsites: HashMap<String, CampsiteAvailabilityData>,
}

/// Per-site availability data for one month
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CampsiteAvailabilityData {
    /// Date string (`2024-07-01T00:00:00Z`) to status string
    #[serde(default, deserialize_with = "null_as_default")]
    pub availabilities: BTreeMap<String, String>,
    /// Campsite ID, repeated from the map key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campsite_id: Option<String>,
    /// Site label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    /// Campsite type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campsite_type: Option<String>,
    /// Loop name
    #[serde(rename = "loop", default, skip_serializing_if = "Option::is_none")]
    pub campsite_loop: Option<String>,
}

/// Formats the `start_date` parameter of the month availability API.
///
/// Any date in a month maps to that month's first day at UTC midnight,
/// e.g. `2024-07-01T00:00:00.000Z`.
pub fn month_start_param(date: NaiveDate) -> String {
    format!(
        "{:04}-{:02}-01T00:00:00.000Z",
        date.year(),
        date.month()
    )
}
