//! HTTP-level tests for the `/api` routes against a wiremock recreation.gov.

use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use campground_availability::AvailabilityAggregator;
use rec_gov::{RecGovClient, RecGovConfig};
use web_handlers::configure_api;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, api_key: Option<&str>) -> RecGovClient {
    RecGovClient::with_config(RecGovConfig {
        ridb_base_url: format!("{}/ridb", server.uri()),
        recreation_base_url: format!("{}/api", server.uri()),
        api_key: api_key.map(str::to_string),
        ..RecGovConfig::default()
    })
    .expect("client construction should not fail")
}

macro_rules! init_app {
    ($client:expr) => {{
        let client = $client;
        let aggregator = AvailabilityAggregator::new(Arc::new(client.clone()), None);
        test::init_service(
            App::new()
                .app_data(web::Data::new(client))
                .app_data(web::Data::new(aggregator))
                .configure(configure_api),
        )
        .await
    }};
}

#[actix_web::test]
async fn availability_endpoint_returns_results_and_summary() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/camps/availability/campground/232447/month"))
        .and(query_param("start_date", "2024-07-01T00:00:00.000Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "campsites": {
                "1": {
                    "site": "A01",
                    "availabilities": { "2024-07-01T00:00:00Z": "Available" }
                },
                "2": {
                    "availabilities": { "2024-07-01T00:00:00Z": "Reserved" }
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = init_app!(client(&server, None));

    let req = test::TestRequest::post()
        .uri("/api/availability")
        .set_json(serde_json::json!({
            "campground_id": "232447",
            "start_date": "2024-07-01",
            "end_date": "2024-07-03"
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["results"]["campground_id"], "232447");
    assert_eq!(body["summary"]["available_count"], 1);
    assert_eq!(body["summary"]["total_count"], 2);
    assert_eq!(body["summary"]["status"], "has_available");
    assert_eq!(
        body["summary"]["booking_url"],
        "https://www.recreation.gov/camping/campgrounds/232447?date=2024-07-01"
    );
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn availability_endpoint_rejects_reversed_dates() {
    let server = MockServer::start().await;
    let app = init_app!(client(&server, None));

    let req = test::TestRequest::post()
        .uri("/api/availability")
        .set_json(serde_json::json!({
            "campground_id": "232447",
            "start_date": "2024-07-05",
            "end_date": "2024-07-01"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_date_range");
    assert_eq!(body["message"], "End date must be after start date");
}

#[actix_web::test]
async fn availability_endpoint_maps_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/camps/availability/campground/999999/month"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let app = init_app!(client(&server, None));

    let req = test::TestRequest::post()
        .uri("/api/availability")
        .set_json(serde_json::json!({
            "campground_id": "999999",
            "start_date": "2024-07-01",
            "end_date": "2024-07-03"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "campground_not_found");
}

#[actix_web::test]
async fn facility_search_filters_to_campgrounds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ridb/facilities"))
        .and(header("apikey", "test-key"))
        .and(query_param("query", "yosemite"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "RECDATA": [
                {
                    "FacilityID": "232447",
                    "FacilityName": "Upper Pines",
                    "FacilityTypeDescription": "Campground",
                    "AddressStateCode": "CA"
                },
                {
                    "FacilityID": "1",
                    "FacilityName": "Visitor Center",
                    "FacilityTypeDescription": "Facility"
                }
            ]
        })))
        .mount(&server)
        .await;

    let app = init_app!(client(&server, Some("test-key")));

    let req = test::TestRequest::get()
        .uri("/api/facilities/search?q=yosemite")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total"], 1);
    assert_eq!(body["results"][0]["id"], "232447");
    assert_eq!(body["results"][0]["type"], "Campground");
    assert!(body.get("message").is_none());
}

#[actix_web::test]
async fn facility_search_without_matches_carries_hint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ridb/facilities"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "RECDATA": [] })),
        )
        .mount(&server)
        .await;

    let app = init_app!(client(&server, Some("test-key")));

    let req = test::TestRequest::get()
        .uri("/api/facilities/search?q=zzzzNoSuchPlace")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total"], 0);
    assert_eq!(
        body["message"],
        "No campgrounds found. Try a different search term."
    );
}

#[actix_web::test]
async fn short_facility_search_skips_directory_and_hint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ridb/facilities"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "RECDATA": [] })),
        )
        .expect(0)
        .mount(&server)
        .await;

    let app = init_app!(client(&server, Some("test-key")));

    let req = test::TestRequest::get()
        .uri("/api/facilities/search?q=a")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total"], 0);
    assert!(body.get("message").is_none());
}

#[actix_web::test]
async fn availability_endpoint_rejects_overlong_range() {
    let server = MockServer::start().await;
    let app = init_app!(client(&server, None));

    let req = test::TestRequest::post()
        .uri("/api/availability")
        .set_json(serde_json::json!({
            "campground_id": "232447",
            "start_date": "2024-01-01",
            "end_date": "9999-12-31"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "range_too_long");
}

#[actix_web::test]
async fn facility_search_requires_query() {
    let server = MockServer::start().await;
    let app = init_app!(client(&server, Some("test-key")));

    let req = test::TestRequest::get()
        .uri("/api/facilities/search")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn facility_search_without_api_key_is_server_error() {
    let server = MockServer::start().await;
    let app = init_app!(client(&server, None));

    let req = test::TestRequest::get()
        .uri("/api/facilities/search?q=yosemite")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "missing_api_key");
}

#[actix_web::test]
async fn unknown_state_is_rejected() {
    let server = MockServer::start().await;
    let app = init_app!(client(&server, Some("test-key")));

    let req = test::TestRequest::get()
        .uri("/api/facilities/state/XX")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn states_and_health_endpoints() {
    let server = MockServer::start().await;
    let app = init_app!(client(&server, None));

    let req = test::TestRequest::get().uri("/api/states").to_request();
    let states: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(states.as_array().map(Vec::len), Some(50));

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let health: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["directory_search_enabled"], false);
}
