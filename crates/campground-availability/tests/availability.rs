//! End-to-end availability checks against a wiremock recreation.gov.

use std::sync::Arc;

use campground_availability::{
    AggregatorConfig, AvailabilityAggregator, AvailabilityError, AvailabilityRequest,
    AvailabilityStatus, derive_summary, plan_months,
};
use chrono::NaiveDate;
use rec_gov::{RecGovClient, RecGovConfig, RecGovError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CAMPGROUND: &str = "232447";
const MONTH_PATH: &str = "/api/camps/availability/campground/232447/month";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn aggregator(server: &MockServer, config: Option<AggregatorConfig>) -> AvailabilityAggregator {
    let client = RecGovClient::with_config(RecGovConfig {
        ridb_base_url: format!("{}/ridb", server.uri()),
        recreation_base_url: format!("{}/api", server.uri()),
        ..RecGovConfig::default()
    })
    .expect("client construction should not fail");

    AvailabilityAggregator::new(Arc::new(client), config)
}

async fn mount_month(server: &MockServer, start_date: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(MONTH_PATH))
        .and(query_param("start_date", start_date))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

fn request(start: NaiveDate, end: NaiveDate) -> AvailabilityRequest {
    AvailabilityRequest {
        campground_id: CAMPGROUND.to_string(),
        start_date: start,
        end_date: end,
    }
}

#[tokio::test]
async fn single_month_search() {
    let server = MockServer::start().await;

    mount_month(
        &server,
        "2024-07-01T00:00:00.000Z",
        serde_json::json!({
            "campsites": {
                "1": {
                    "availabilities": {
                        "2024-07-01": "Available",
                        "2024-07-02": "Reserved"
                    }
                }
            }
        }),
    )
    .await;

    let months = plan_months(date(2024, 7, 1), date(2024, 7, 3));
    assert_eq!(
        months.iter().map(ToString::to_string).collect::<Vec<_>>(),
        vec!["2024-07-01T00:00:00.000Z"]
    );

    let results = aggregator(&server, None)
        .check_availability(&request(date(2024, 7, 1), date(2024, 7, 3)))
        .await
        .expect("search should succeed");
    let summary = derive_summary(&results);

    assert_eq!(summary.available_count, 1);
    assert_eq!(summary.total_count, 1);
    assert_eq!(summary.status, AvailabilityStatus::HasAvailable);
    assert_eq!(
        summary.booking_url,
        "https://www.recreation.gov/camping/campgrounds/232447?date=2024-07-01"
    );
}

#[tokio::test]
async fn month_boundary_search_unions_sites() {
    let server = MockServer::start().await;

    mount_month(
        &server,
        "2024-07-01T00:00:00.000Z",
        serde_json::json!({
            "campsites": {
                "1": { "availabilities": { "2024-07-31T00:00:00Z": "Reserved" } }
            }
        }),
    )
    .await;
    mount_month(
        &server,
        "2024-08-01T00:00:00.000Z",
        serde_json::json!({
            "campsites": {
                "1": { "availabilities": { "2024-08-01T00:00:00Z": "Reserved" } },
                "2": { "availabilities": { "2024-08-01T00:00:00Z": "Reserved" } }
            }
        }),
    )
    .await;

    let results = aggregator(&server, None)
        .check_availability(&request(date(2024, 7, 25), date(2024, 8, 5)))
        .await
        .expect("search should succeed");

    let site = results.data.get("1").expect("site 1 present");
    assert_eq!(site.availabilities.len(), 2);
    assert_eq!(results.data.len(), 2);

    let summary = derive_summary(&results);
    assert_eq!(summary.available_count, 0);
    assert_eq!(summary.status, AvailabilityStatus::FullyBooked);
}

#[tokio::test]
async fn second_month_not_found_fails_whole_search() {
    let server = MockServer::start().await;

    mount_month(
        &server,
        "2024-07-01T00:00:00.000Z",
        serde_json::json!({
            "campsites": {
                "1": { "availabilities": { "2024-07-31T00:00:00Z": "Available" } }
            }
        }),
    )
    .await;

    Mock::given(method("GET"))
        .and(path(MONTH_PATH))
        .and(query_param("start_date", "2024-08-01T00:00:00.000Z"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = aggregator(&server, None)
        .check_availability(&request(date(2024, 7, 25), date(2024, 8, 5)))
        .await
        .expect_err("a failing month aborts the search");

    assert_eq!(
        err,
        AvailabilityError::Upstream(RecGovError::NotFound {
            campground_id: CAMPGROUND.to_string()
        })
    );
    assert_eq!(
        err.to_string(),
        "Campground not found (ID: 232447). This campground may not exist or may not be available for online reservations."
    );
}

#[tokio::test]
async fn concurrent_fetch_merges_the_same_result() {
    let server = MockServer::start().await;

    for (start_date, day) in [
        ("2024-07-01T00:00:00.000Z", "2024-07-31T00:00:00Z"),
        ("2024-08-01T00:00:00.000Z", "2024-08-01T00:00:00Z"),
        ("2024-09-01T00:00:00.000Z", "2024-09-01T00:00:00Z"),
    ] {
        mount_month(
            &server,
            start_date,
            serde_json::json!({
                "campsites": { "1": { "availabilities": { day: "Available" } } }
            }),
        )
        .await;
    }

    let results = aggregator(
        &server,
        Some(AggregatorConfig {
            max_concurrent_months: 3,
            ..AggregatorConfig::default()
        }),
    )
    .check_availability(&request(date(2024, 7, 25), date(2024, 9, 2)))
    .await
    .expect("search should succeed");

    assert_eq!(results.data.len(), 1);
    assert_eq!(results.data.get("1").unwrap().availabilities.len(), 3);
}

#[tokio::test]
async fn empty_campground_is_no_site_data() {
    let server = MockServer::start().await;

    mount_month(&server, "2024-07-01T00:00:00.000Z", serde_json::json!({})).await;

    let results = aggregator(&server, None)
        .check_availability(&request(date(2024, 7, 1), date(2024, 7, 3)))
        .await
        .expect("missing campsites is not an error");

    let summary = derive_summary(&results);
    assert_eq!(summary.total_count, 0);
    assert_eq!(summary.available_count, 0);
    assert_eq!(summary.status, AvailabilityStatus::NoSiteData);
}

#[tokio::test]
async fn rate_limit_and_server_errors_are_classified() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(MONTH_PATH))
        .and(query_param("start_date", "2024-07-01T00:00:00.000Z"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(MONTH_PATH))
        .and(query_param("start_date", "2024-10-01T00:00:00.000Z"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let aggregator = aggregator(&server, None);

    let err = aggregator
        .check_availability(&request(date(2024, 7, 1), date(2024, 7, 3)))
        .await
        .unwrap_err();
    assert_eq!(err, AvailabilityError::Upstream(RecGovError::RateLimited));

    let err = aggregator
        .check_availability(&request(date(2024, 10, 1), date(2024, 10, 3)))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Recreation.gov server error. Please try again later."
    );
}
