use actix_web::{HttpResponse, Result, web};
use campground_availability::{
    AvailabilityAggregator, AvailabilityError, AvailabilityReport, AvailabilityRequest,
};

use crate::handler_types::AvailabilityResponse;

/// Checks availability for a campground over a date range
pub async fn check_availability(
    aggregator: web::Data<AvailabilityAggregator>,
    request: web::Json<AvailabilityRequest>,
) -> Result<HttpResponse, AvailabilityError> {
    log::info!(
        "⛺ Checking campground {} from {} to {}",
        request.campground_id,
        request.start_date,
        request.end_date
    );

    let results = aggregator.check_availability(&request).await?;
    let report = AvailabilityReport::new(results);

    log::info!(
        "✅ Campground {}: {} of {} sites available",
        report.results.campground_id,
        report.summary.available_count,
        report.summary.total_count
    );

    let message = report.summary.headline();
    Ok(HttpResponse::Ok().json(AvailabilityResponse {
        results: report.results,
        summary: report.summary,
        message,
    }))
}

/// Health check endpoint
pub async fn api_health(client: web::Data<rec_gov::RecGovClient>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "service": "campsite-availability",
        "status": "healthy",
        "directory_search_enabled": client.has_api_key(),
        "timestamp": chrono::Utc::now()
    })))
}
