use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::aggregator::AvailabilityAggregator;
use crate::availability_types::*;
use crate::summary::{AvailabilitySummary, derive_summary};

/// Identifies one submission within a [`SearchSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

/// Completed search with its derived summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityReport {
    /// Query echo and merged availability
    pub results: AvailabilityResults,
    /// Counts and booking link derived from `results`
    pub summary: AvailabilitySummary,
}

impl AvailabilityReport {
    /// Derives the summary for a set of results
    pub fn new(results: AvailabilityResults) -> Self {
        let summary = derive_summary(&results);
        Self { results, summary }
    }
}

/// State of the current result slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SearchState {
    /// Nothing submitted yet
    Idle,
    /// A search is running
    InFlight,
    /// The latest search failed
    Failed {
        /// User-facing error message
        message: String,
    },
    /// The latest search completed
    Completed(Box<AvailabilityReport>),
}

/// What happened to a finished search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The search was current and its state is now in the slot
    Applied(SearchState),
    /// A newer search was submitted meanwhile; the result was discarded
    Superseded,
}

/// Owns the single "current result" slot for one user.
///
/// Each submission takes a new generation ticket. A search that finishes
/// after a newer one was submitted never overwrites the slot.
pub struct SearchSession {
    aggregator: Arc<AvailabilityAggregator>,
    generation: AtomicU64,
    state: RwLock<SearchState>,
}

impl SearchSession {
    /// Create an idle session
    pub fn new(aggregator: Arc<AvailabilityAggregator>) -> Self {
        Self {
            aggregator,
            generation: AtomicU64::new(0),
            state: RwLock::new(SearchState::Idle),
        }
    }

    /// Starts a new generation and marks the slot in flight
    pub async fn begin(&self) -> SearchTicket {
        let mut state = self.state.write().await;
        let ticket = SearchTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
        *state = SearchState::InFlight;
        ticket
    }

    /// Whether `ticket` belongs to the most recent submission
    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Runs a search to completion and stores its result if still current
    pub async fn submit(&self, request: &AvailabilityRequest) -> SearchOutcome {
        let ticket = self.begin().await;
        debug!(
            "Search {:?} for campground {} from {} to {}",
            ticket, request.campground_id, request.start_date, request.end_date
        );

        let result = self.aggregator.check_availability(request).await;
        self.complete(ticket, result).await
    }

    /// Records the result of the search identified by `ticket`
    pub async fn complete(
        &self,
        ticket: SearchTicket,
        result: Result<AvailabilityResults, AvailabilityError>,
    ) -> SearchOutcome {
        let mut state = self.state.write().await;

        if !self.is_current(ticket) {
            debug!("Discarding result of superseded search {:?}", ticket);
            return SearchOutcome::Superseded;
        }

        let next = match result {
            Ok(results) => SearchState::Completed(Box::new(AvailabilityReport::new(results))),
            Err(e) => SearchState::Failed {
                message: e.to_string(),
            },
        };

        *state = next.clone();
        SearchOutcome::Applied(next)
    }

    /// Snapshot of the current slot
    pub async fn current(&self) -> SearchState {
        self.state.read().await.clone()
    }
}
