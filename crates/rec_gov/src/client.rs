use std::time::Duration;

use chrono::NaiveDate;
use rand::seq::IndexedRandom;
use reqwest::{Client, RequestBuilder};
use tracing::{debug, info, warn};

use crate::error::RecGovError;
use crate::states::POPULAR_STATES;
use crate::types::*;

/// Autocomplete searches shorter than this return no results without a request.
pub const AUTOCOMPLETE_MIN_CHARS: usize = 2;

const AUTOCOMPLETE_LIMIT: u32 = 20;
const STATE_BROWSE_LIMIT: u32 = 50;
const POPULAR_PER_STATE_LIMIT: u32 = 10;
const FALLBACK_USER_AGENT: &str = "campsite-availability/0.1";

/// Configuration for [`RecGovClient`]
#[derive(Debug, Clone)]
pub struct RecGovConfig {
    /// Base URL of the RIDB facility directory
    pub ridb_base_url: String,

    /// Base URL of the recreation.gov internal API (month availability)
    pub recreation_base_url: String,

    /// RIDB API key, sent only to the facility directory
    pub api_key: Option<String>,

    /// Per-request timeout (default: 30 seconds)
    pub timeout: Duration,

    /// User agents to pick from when building the client
    pub user_agents: Vec<String>,
}

impl Default for RecGovConfig {
    fn default() -> Self {
        Self {
            ridb_base_url: "https://ridb.recreation.gov/api/v1".to_string(),
            recreation_base_url: "https://www.recreation.gov/api".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            user_agents: vec![
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36".to_string(),
            ],
        }
    }
}

/// Client for interacting with the recreation.gov APIs
#[derive(Debug, Clone)]
pub struct RecGovClient {
    client: Client,
    ridb_base_url: String,
    recreation_base_url: String,
    api_key: Option<String>,
}

impl RecGovClient {
    /// Create a new recreation.gov API client against the production endpoints
    pub fn new(api_key: Option<String>) -> Result<Self, RecGovError> {
        Self::with_config(RecGovConfig {
            api_key,
            ..RecGovConfig::default()
        })
    }

    /// Create a client from an explicit configuration (e.g. to point at a mock server)
    pub fn with_config(config: RecGovConfig) -> Result<Self, RecGovError> {
        let user_agent = config
            .user_agents
            .choose(&mut rand::rng())
            .map(String::as_str)
            .unwrap_or(FALLBACK_USER_AGENT);

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(|e| RecGovError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        // Blank keys come from empty env vars; treat them as absent.
        let api_key = config.api_key.filter(|key| !key.trim().is_empty());

        info!(
            "Recreation.gov client initialized. API key present: {}",
            api_key.is_some()
        );

        Ok(Self {
            client,
            ridb_base_url: config.ridb_base_url.trim_end_matches('/').to_string(),
            recreation_base_url: config.recreation_base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Whether a directory API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search for facilities by name, optionally filtered by state and activity.
    ///
    /// Fails with [`RecGovError::MissingApiKey`] before any request when no key is configured.
    pub async fn search_facilities(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<Facility>, RecGovError> {
        let api_key = self.require_api_key()?;

        let mut params = vec![
            ("query", query.to_string()),
            ("limit", options.limit.to_string()),
            ("offset", options.offset.to_string()),
        ];

        if let Some(ref state) = options.state {
            params.push(("state", state.clone()));
        }

        if let Some(ref activity) = options.activity {
            params.push(("activity", activity.clone()));
        }

        let url = format!("{}/facilities", self.ridb_base_url);
        debug!("Searching facilities: {} {:?}", url, params);

        let request = self.client.get(&url).query(&params).header("apikey", api_key);
        let facilities = self.send_directory_request(request).await?;

        debug!("Facility search for {:?} returned {}", query, facilities.len());
        Ok(facilities)
    }

    /// Browse camping facilities, optionally by state or around a point.
    ///
    /// The API key is attached when configured but not required.
    pub async fn get_campgrounds(
        &self,
        options: &CampgroundOptions,
    ) -> Result<Vec<Facility>, RecGovError> {
        let mut params = vec![
            ("activity", "CAMPING".to_string()),
            ("limit", options.limit.to_string()),
            ("offset", options.offset.to_string()),
        ];

        if let Some(ref state) = options.state {
            params.push(("state", state.clone()));
        }

        if let Some(ref near) = options.near {
            params.push(("latitude", near.latitude.to_string()));
            params.push(("longitude", near.longitude.to_string()));
            params.push(("radius", near.radius.to_string()));
        }

        let url = format!("{}/facilities", self.ridb_base_url);
        debug!("Fetching campgrounds: {} {:?}", url, params);

        let request = self.with_optional_key(self.client.get(&url).query(&params));
        self.send_directory_request(request).await
    }

    /// Get detailed information about a specific facility
    pub async fn get_facility_details(&self, facility_id: &str) -> Result<Facility, RecGovError> {
        debug!("Getting facility details for {}", facility_id);

        let url = format!(
            "{}/facilities/{}",
            self.ridb_base_url,
            urlencoding::encode(facility_id)
        );

        let response = self
            .with_optional_key(self.client.get(&url))
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Facility details request failed with status {}: {}", status, body);
            return Err(RecGovError::from_directory_status(status, body));
        }

        let facility: Facility = response
            .json()
            .await
            .map_err(|e| RecGovError::DataFormat(format!("Failed to parse facility details: {}", e)))?;

        Ok(facility)
    }

    /// Search-as-you-type lookup restricted to campgrounds.
    ///
    /// Terms shorter than [`AUTOCOMPLETE_MIN_CHARS`] return an empty list without a request.
    pub async fn search_facilities_autocomplete(
        &self,
        term: &str,
    ) -> Result<Vec<SearchResultItem>, RecGovError> {
        if term.chars().count() < AUTOCOMPLETE_MIN_CHARS {
            return Ok(Vec::new());
        }

        let options = SearchOptions {
            limit: AUTOCOMPLETE_LIMIT,
            ..SearchOptions::default()
        };
        let facilities = self.search_facilities(term, &options).await?;
        let found = facilities.len();

        let results: Vec<SearchResultItem> = facilities
            .iter()
            .filter(|facility| facility.is_campground())
            .map(Facility::to_search_result)
            .collect();

        debug!(
            "Autocomplete {:?}: {} facilities, {} campgrounds",
            term,
            found,
            results.len()
        );

        Ok(results)
    }

    /// Camping facilities in one state, normalized for display
    pub async fn get_campgrounds_by_state(
        &self,
        state: &str,
    ) -> Result<Vec<SearchResultItem>, RecGovError> {
        let options = CampgroundOptions {
            limit: STATE_BROWSE_LIMIT,
            state: Some(state.to_uppercase()),
            ..CampgroundOptions::default()
        };

        let campgrounds = self.get_campgrounds(&options).await?;
        Ok(campgrounds.iter().map(Facility::to_search_result).collect())
    }

    /// A sample of campgrounds from a fixed list of popular states.
    ///
    /// States are queried one at a time; a failing state is logged and skipped.
    pub async fn get_popular_campgrounds(
        &self,
        limit: usize,
    ) -> Result<Vec<SearchResultItem>, RecGovError> {
        self.require_api_key()?;

        let mut all_campgrounds = Vec::new();

        for state in POPULAR_STATES {
            let options = CampgroundOptions {
                limit: POPULAR_PER_STATE_LIMIT,
                state: Some(state.to_string()),
                ..CampgroundOptions::default()
            };

            match self.get_campgrounds(&options).await {
                Ok(campgrounds) => all_campgrounds.extend(campgrounds),
                Err(e) => warn!("Error fetching campgrounds for {}: {}", state, e),
            }
        }

        Ok(all_campgrounds
            .iter()
            .take(limit)
            .map(|facility| SearchResultItem {
                description: None,
                ..facility.to_search_result()
            })
            .collect())
    }

    /// Fetch one month of per-site availability for a campground.
    ///
    /// `month` may be any day of the month; the request always uses the month's first day.
    pub async fn get_month_availability(
        &self,
        campground_id: &str,
        month: NaiveDate,
    ) -> Result<MonthAvailabilityResponse, RecGovError> {
        let url = format!(
            "{}/camps/availability/campground/{}/month",
            self.recreation_base_url,
            urlencoding::encode(campground_id)
        );
        let start_date = month_start_param(month);

        debug!("Making request to: {}?start_date={}", url, start_date);

        let response = self
            .client
            .get(&url)
            .query(&[("start_date", start_date.as_str())])
            .header("Accept", "application/json")
            .send()
            .await?;

        debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            warn!("API request failed with status {}: {}", status, body);

            return Err(RecGovError::from_availability_status(status, campground_id));
        }

        let month_response: MonthAvailabilityResponse = response
            .json()
            .await
            .map_err(|e| RecGovError::DataFormat(format!("Failed to parse response: {}", e)))?;

        debug!(
            "Campground {} month {}: {} campsites",
            campground_id,
            start_date,
            month_response.campsites.len()
        );

        Ok(month_response)
    }

    fn require_api_key(&self) -> Result<&str, RecGovError> {
        match self.api_key.as_deref() {
            Some(key) => Ok(key),
            None => {
                warn!("No API key configured, directory search is unavailable");
                Err(RecGovError::MissingApiKey)
            }
        }
    }

    fn with_optional_key(&self, request: RequestBuilder) -> RequestBuilder {
        match self.api_key {
            Some(ref key) => request.header("apikey", key),
            None => request,
        }
    }

    async fn send_directory_request(
        &self,
        request: RequestBuilder,
    ) -> Result<Vec<Facility>, RecGovError> {
        let response = request.header("Accept", "application/json").send().await?;

        debug!("Directory response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Directory request failed with status {}: {}", status, body);
            return Err(RecGovError::from_directory_status(status, body));
        }

        let facility_response: FacilityResponse = response.json().await.map_err(|e| {
            RecGovError::DataFormat(format!("Failed to parse facility response: {}", e))
        })?;

        Ok(facility_response.rec_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_api_key_is_absent() {
        let client = RecGovClient::new(Some("   ".to_string())).unwrap();
        assert!(!client.has_api_key());

        let client = RecGovClient::new(Some("abc".to_string())).unwrap();
        assert!(client.has_api_key());
    }

    #[test]
    fn test_base_urls_are_normalized() {
        let client = RecGovClient::with_config(RecGovConfig {
            ridb_base_url: "http://localhost:1/ridb/".to_string(),
            recreation_base_url: "http://localhost:1/api/".to_string(),
            ..RecGovConfig::default()
        })
        .unwrap();

        assert_eq!(client.ridb_base_url, "http://localhost:1/ridb");
        assert_eq!(client.recreation_base_url, "http://localhost:1/api");
    }

    #[tokio::test]
    async fn test_search_without_key_fails_fast() {
        let client = RecGovClient::new(None).unwrap();

        let err = client
            .search_facilities("Yosemite", &SearchOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err, RecGovError::MissingApiKey);

        let err = client.get_popular_campgrounds(20).await.unwrap_err();
        assert_eq!(err, RecGovError::MissingApiKey);
    }

    #[tokio::test]
    async fn test_short_autocomplete_term_skips_request() {
        // No key configured: reaching the directory would fail with MissingApiKey.
        let client = RecGovClient::new(None).unwrap();

        assert!(client.search_facilities_autocomplete("").await.unwrap().is_empty());
        assert!(client.search_facilities_autocomplete("Y").await.unwrap().is_empty());
    }
}
