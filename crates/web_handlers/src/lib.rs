//! # Web Handlers for the Campsite Availability Checker
//!
//! This crate provides the web handlers that expose campground search and
//! availability checks to the frontend as JSON.

use actix_web::web;

/// Request and response types for the handlers
mod handler_types;
pub use handler_types::*;

/// Campground directory handlers (search, browse by state, details)
mod facility_handlers;
pub use facility_handlers::*;

/// Availability check and health handlers
mod availability_handlers;
pub use availability_handlers::*;

/// Registers every `/api` route.
///
/// Expects `web::Data<RecGovClient>` and `web::Data<AvailabilityAggregator>`
/// to be registered as app data.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(api_health))
            .route("/states", web::get().to(list_states))
            .route("/availability", web::post().to(check_availability))
            .service(
                web::scope("/facilities")
                    .route("/search", web::get().to(facilities_search))
                    .route("/popular", web::get().to(popular_campgrounds))
                    .route("/state/{code}", web::get().to(campgrounds_by_state))
                    .route("/{facility_id}", web::get().to(facility_details)),
            ),
    );
}
