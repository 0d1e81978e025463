use std::collections::BTreeSet;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use rec_gov::{MonthAvailabilityResponse, RecGovClient, RecGovError};
use tracing::{debug, info, warn};
use validator::Validate;

use crate::availability_types::*;
use crate::month_plan::plan_range;

/// Source of one month of per-site availability for a campground
#[async_trait::async_trait]
pub trait MonthlyAvailabilitySource: Send + Sync {
    /// Fetches the month identified by `month` for `campground_id`
    async fn fetch_month(
        &self,
        campground_id: &str,
        month: MonthKey,
    ) -> Result<MonthAvailabilityResponse, RecGovError>;
}

#[async_trait::async_trait]
impl MonthlyAvailabilitySource for RecGovClient {
    async fn fetch_month(
        &self,
        campground_id: &str,
        month: MonthKey,
    ) -> Result<MonthAvailabilityResponse, RecGovError> {
        self.get_month_availability(campground_id, month.first_day())
            .await
    }
}

/// Configuration for [`AvailabilityAggregator`]
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Maximum month requests in flight at once (default: 1, strictly sequential)
    pub max_concurrent_months: usize,
    /// Maximum months one search may touch (default: 13)
    pub max_search_months: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_months: 1,
            max_search_months: 13,
        }
    }
}

/// Fetches every month of a search and merges the per-site maps.
///
/// The first failing month aborts the whole aggregation; no partial
/// result is ever returned.
pub struct AvailabilityAggregator {
    source: Arc<dyn MonthlyAvailabilitySource>,
    config: AggregatorConfig,
}

impl AvailabilityAggregator {
    /// Create an aggregator over a month source
    pub fn new(
        source: Arc<dyn MonthlyAvailabilitySource>,
        config: Option<AggregatorConfig>,
    ) -> Self {
        Self {
            source,
            config: config.unwrap_or_default(),
        }
    }

    /// Fetch and merge availability for every month in `months`
    pub async fn fetch_availability(
        &self,
        campground_id: &str,
        months: &BTreeSet<MonthKey>,
    ) -> Result<AggregatedAvailability, AvailabilityError> {
        debug!(
            "Fetching {} month(s) for campground {}: {:?}",
            months.len(),
            campground_id,
            months.iter().map(ToString::to_string).collect::<Vec<_>>()
        );

        let aggregated = if self.config.max_concurrent_months <= 1 {
            self.fetch_sequential(campground_id, months).await?
        } else {
            self.fetch_concurrent(campground_id, months).await?
        };

        info!(
            "Aggregated {} site(s) across {} month(s) for campground {}",
            aggregated.len(),
            months.len(),
            campground_id
        );

        Ok(aggregated)
    }

    /// Validate a request, plan its months and aggregate them
    pub async fn check_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<AvailabilityResults, AvailabilityError> {
        request
            .validate()
            .map_err(|e| AvailabilityError::Validation(e.to_string()))?;

        let range = request.date_range()?;
        let months = plan_range(&range);
        if months.len() > self.config.max_search_months {
            return Err(AvailabilityError::RangeTooLong {
                months: months.len(),
                max: self.config.max_search_months,
            });
        }
        let data = self
            .fetch_availability(&request.campground_id, &months)
            .await?;

        Ok(AvailabilityResults {
            campground_id: request.campground_id.clone(),
            start_date: range.start(),
            end_date: range.end(),
            data,
        })
    }

    async fn fetch_sequential(
        &self,
        campground_id: &str,
        months: &BTreeSet<MonthKey>,
    ) -> Result<AggregatedAvailability, AvailabilityError> {
        let mut aggregated = AggregatedAvailability::default();

        for month in months {
            let response = self
                .source
                .fetch_month(campground_id, *month)
                .await
                .inspect_err(|e| warn!("Aggregation aborted at month {}: {}", month, e))?;

            aggregated.merge_month(response);
        }

        Ok(aggregated)
    }

    async fn fetch_concurrent(
        &self,
        campground_id: &str,
        months: &BTreeSet<MonthKey>,
    ) -> Result<AggregatedAvailability, AvailabilityError> {
        let source = &self.source;

        let mut fetches = stream::iter(months.iter().copied())
            .map(|month| async move {
                source
                    .fetch_month(campground_id, month)
                    .await
                    .map_err(|e| (month, e))
            })
            .buffer_unordered(self.config.max_concurrent_months);

        let mut aggregated = AggregatedAvailability::default();

        // Returning early drops the stream, cancelling requests still in flight.
        while let Some(result) = fetches.next().await {
            match result {
                Ok(response) => aggregated.merge_month(response),
                Err((month, e)) => {
                    warn!("Aggregation aborted at month {}: {}", month, e);
                    return Err(e.into());
                }
            }
        }

        Ok(aggregated)
    }
}
