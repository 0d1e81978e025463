use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rec_gov::{AUTOCOMPLETE_MIN_CHARS, RecGovClient, RecGovError, SearchResultItem};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Delay between the last keystroke and the directory search
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Hint shown when a search matched nothing
pub const NO_MATCHES_HINT: &str = "No campgrounds found. Try a different search term.";

/// Campground lookup used for search-as-you-type
#[async_trait::async_trait]
pub trait FacilityDirectory: Send + Sync {
    /// Campgrounds matching `term`
    async fn autocomplete(&self, term: &str) -> Result<Vec<SearchResultItem>, RecGovError>;
}

#[async_trait::async_trait]
impl FacilityDirectory for RecGovClient {
    async fn autocomplete(&self, term: &str) -> Result<Vec<SearchResultItem>, RecGovError> {
        self.search_facilities_autocomplete(term).await
    }
}

/// Runs the most recently scheduled task after a quiet period.
///
/// Scheduling a task cancels the pending one, whether it is still waiting
/// or already running.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet period
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Replaces any pending task with `task`, started after the delay
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });

        if let Some(previous) = self.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Cancels the pending task, if any
    pub fn cancel(&self) {
        if let Some(previous) = self.lock().take() {
            previous.abort();
        }
    }

    /// Whether a scheduled task has not finished yet
    pub fn is_pending(&self) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        // A panicking task cannot leave the handle slot half-written.
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Suggestion dropdown state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SuggestionState {
    /// Nothing to show
    Hidden,
    /// A directory search is running
    Searching,
    /// Matching campgrounds
    Results {
        /// Campgrounds to offer
        items: Vec<SearchResultItem>,
    },
    /// The search succeeded but matched nothing
    NoMatches {
        /// User-facing hint
        hint: String,
    },
    /// The search failed
    Failed {
        /// User-facing error message
        message: String,
    },
}

/// Search-as-you-type state for one campground picker
pub struct AutocompleteSession {
    directory: Arc<dyn FacilityDirectory>,
    debouncer: Debouncer,
    selection: Mutex<Option<SearchResultItem>>,
    state: Arc<watch::Sender<SuggestionState>>,
    // Bumped on every input change and selection. A search only publishes
    // while the generation it started under is still current.
    generation: Arc<AtomicU64>,
}

impl AutocompleteSession {
    /// Create a session with the default 300ms debounce
    pub fn new(directory: Arc<dyn FacilityDirectory>) -> Self {
        Self::with_delay(directory, DEFAULT_DEBOUNCE)
    }

    /// Create a session with a custom debounce delay
    pub fn with_delay(directory: Arc<dyn FacilityDirectory>, delay: Duration) -> Self {
        let (state, _) = watch::channel(SuggestionState::Hidden);
        Self {
            directory,
            debouncer: Debouncer::new(delay),
            selection: Mutex::new(None),
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Handles a change to the search box text.
    ///
    /// Editing away from a selected campground clears the selection. Text
    /// equal to the selected name (the box being filled in by [`select`])
    /// does not trigger a search.
    ///
    /// [`select`]: AutocompleteSession::select
    pub fn input_changed(&self, text: &str) {
        {
            let mut selection = self.lock_selection();
            if selection.as_ref().is_some_and(|item| item.name == text) {
                return;
            }
            *selection = None;
        }

        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if text.chars().count() < AUTOCOMPLETE_MIN_CHARS {
            self.debouncer.cancel();
            self.state.send_replace(SuggestionState::Hidden);
            return;
        }

        let directory = self.directory.clone();
        let state = self.state.clone();
        let generation = self.generation.clone();
        let term = text.to_string();

        self.debouncer.schedule(async move {
            // Aborting only lands at an await point, so a search that already
            // returned must check it is still current before publishing.
            let publish = |next: SuggestionState| {
                state.send_if_modified(|current| {
                    if generation.load(Ordering::SeqCst) != ticket {
                        return false;
                    }
                    *current = next;
                    true
                });
            };

            publish(SuggestionState::Searching);
            debug!("Autocomplete search for {:?}", term);

            let next = match directory.autocomplete(&term).await {
                Ok(items) if items.is_empty() => SuggestionState::NoMatches {
                    hint: NO_MATCHES_HINT.to_string(),
                },
                Ok(items) => SuggestionState::Results { items },
                Err(e) => SuggestionState::Failed {
                    message: e.to_string(),
                },
            };
            publish(next);
        });
    }

    /// Picks a suggestion, hiding the dropdown and cancelling pending searches
    pub fn select(&self, item: SearchResultItem) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.debouncer.cancel();
        *self.lock_selection() = Some(item);
        self.state.send_replace(SuggestionState::Hidden);
    }

    /// Currently selected campground
    pub fn selection(&self) -> Option<SearchResultItem> {
        self.lock_selection().clone()
    }

    /// Current suggestion state
    pub fn state(&self) -> SuggestionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every suggestion state change
    pub fn subscribe(&self) -> watch::Receiver<SuggestionState> {
        self.state.subscribe()
    }

    fn lock_selection(&self) -> MutexGuard<'_, Option<SearchResultItem>> {
        self.selection.lock().unwrap_or_else(|e| e.into_inner())
    }
}
