use actix_web::{HttpResponse, Result, web};
use rec_gov::{AUTOCOMPLETE_MIN_CHARS, RecGovClient, RecGovError, US_STATES, find_state};

use crate::handler_types::*;

const NO_STATE_MATCHES_HINT: &str = "No campgrounds found in this state.";
const DEFAULT_POPULAR_LIMIT: usize = 20;

/// Search-as-you-type campground lookup
pub async fn facilities_search(
    client: web::Data<RecGovClient>,
    query: web::Query<FacilitySearchQuery>,
) -> Result<HttpResponse, RecGovError> {
    let Some(ref q) = query.q else {
        log::info!("❌ Missing query parameter");
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "validation_error",
            "message": "Missing query parameter"
        })));
    };

    log::info!("🔍 Facilities search called with query: {}", q);

    let results = client.search_facilities_autocomplete(q).await?;
    let mut response = FacilitySearchResponse::new(results, campground_availability::NO_MATCHES_HINT);

    // Too short to reach the directory: nothing was searched, so no hint.
    if q.chars().count() < AUTOCOMPLETE_MIN_CHARS {
        response.message = None;
    }

    Ok(HttpResponse::Ok().json(response))
}

/// Campgrounds in one state
pub async fn campgrounds_by_state(
    client: web::Data<RecGovClient>,
    path: web::Path<String>,
) -> Result<HttpResponse, RecGovError> {
    let code = path.into_inner();

    let Some(state) = find_state(&code) else {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "unknown_state",
            "message": format!("Unknown state code: {}", code)
        })));
    };

    log::info!("🏞️ Loading campgrounds for {}", state.name);

    let results = client.get_campgrounds_by_state(state.code).await?;

    Ok(HttpResponse::Ok().json(FacilitySearchResponse::new(results, NO_STATE_MATCHES_HINT)))
}

/// Campgrounds from a handful of popular states
pub async fn popular_campgrounds(
    client: web::Data<RecGovClient>,
    query: web::Query<PopularQuery>,
) -> Result<HttpResponse, RecGovError> {
    let limit = query.limit.unwrap_or(DEFAULT_POPULAR_LIMIT);
    let results = client.get_popular_campgrounds(limit).await?;

    Ok(HttpResponse::Ok().json(FacilitySearchResponse::new(
        results,
        campground_availability::NO_MATCHES_HINT,
    )))
}

/// Directory record for one facility
pub async fn facility_details(
    client: web::Data<RecGovClient>,
    path: web::Path<String>,
) -> Result<HttpResponse, RecGovError> {
    let facility = client.get_facility_details(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(facility))
}

/// State codes for the browse-by-state selector
pub async fn list_states() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(US_STATES))
}
