use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::LibrarySection,
    services::{
        curation::{upsert_collection, UpsertOutcome},
        matcher::{find_matches, SEARCH_RESULT_CAP},
        providers::{MediaCatalog, RecommendationSource},
        recommend::{build_prompt, parse_titles},
    },
};

/// What a failure at one site does to the rest of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureAction {
    /// Terminate `run` with the error
    AbortRun,
    /// End the current cycle early; the run survives and sleeps
    AbortCycle,
    /// Log, skip the current library, continue with the next
    SkipLibrary,
}

/// Per-site failure policy
///
/// The defaults are a deliberate asymmetry: credential and model failures
/// end the run (fail-fast on misconfiguration), while a single library
/// failing to yield history only skips that library. Collection mutations
/// sit in between: a transient catalog error ends the cycle so a
/// half-applied replace is retried from scratch next interval.
#[derive(Debug, Clone)]
pub struct FailurePolicy {
    pub authenticate: FailureAction,
    pub fetch_history: FailureAction,
    pub recommend: FailureAction,
    pub curate: FailureAction,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self {
            authenticate: FailureAction::AbortRun,
            fetch_history: FailureAction::SkipLibrary,
            recommend: FailureAction::AbortRun,
            curate: FailureAction::AbortCycle,
        }
    }
}

/// Counters for one full pass over the configured libraries
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleSummary {
    pub libraries_processed: usize,
    pub libraries_skipped: usize,
    pub collections_created: usize,
    pub collections_updated: usize,
    pub upserts_skipped: usize,
}

/// How a handled (non-fatal) failure redirects the cycle
enum CycleControl {
    SkipLibrary,
    EndCycle,
}

fn apply_policy(
    action: FailureAction,
    site: &'static str,
    library: &str,
    err: AppError,
) -> Result<CycleControl, AppError> {
    tracing::error!(site = site, library = %library, error = %err, "Cycle step failed");
    match action {
        FailureAction::AbortRun => Err(err),
        FailureAction::AbortCycle => Ok(CycleControl::EndCycle),
        FailureAction::SkipLibrary => Ok(CycleControl::SkipLibrary),
    }
}

/// Sequences the poll cycles: authenticate, walk each library through
/// fetch → prompt → complete → parse → match → upsert, then sleep.
pub struct Curator {
    catalog: Arc<dyn MediaCatalog>,
    recommender: Arc<dyn RecommendationSource>,
    config: Config,
    policy: FailurePolicy,
}

impl Curator {
    pub fn new(
        catalog: Arc<dyn MediaCatalog>,
        recommender: Arc<dyn RecommendationSource>,
        config: Config,
    ) -> Self {
        Self {
            catalog,
            recommender,
            config,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Runs cycles forever, or until a fatal failure or a shutdown signal
    ///
    /// The interval wait races ctrl-c so a supervisor gets an orderly exit
    /// point between cycles instead of killing a blocked sleeper.
    pub async fn run(&self) -> AppResult<()> {
        loop {
            let summary = self.run_cycle().await?;
            tracing::info!(
                processed = summary.libraries_processed,
                skipped = summary.libraries_skipped,
                created = summary.collections_created,
                updated = summary.collections_updated,
                "Cycle complete"
            );

            tracing::info!(seconds = self.config.seconds_to_wait, "Waiting on next cycle");
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(self.config.seconds_to_wait)) => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received, exiting");
                    return Ok(());
                }
            }
        }
    }

    /// One full pass over the configured libraries
    ///
    /// Re-authenticates at the start of every cycle rather than reusing a
    /// session across the sleep; tokens rotated during a half-day wait
    /// must not strand the loop.
    pub async fn run_cycle(&self) -> AppResult<CycleSummary> {
        let mut summary = CycleSummary::default();

        tracing::info!("Starting collection run");
        if let Err(e) = self.catalog.authenticate().await {
            tracing::error!(error = %e, "Plex authorization error");
            return match self.policy.authenticate {
                FailureAction::AbortRun => Err(e),
                _ => Ok(summary),
            };
        }
        tracing::info!("Connected to Plex server");

        for library_name in &self.config.library_names {
            let name = library_name.trim();

            let (section, watched) = match self.fetch_history(name).await {
                Ok(fetched) => fetched,
                Err(e) => match apply_policy(self.policy.fetch_history, "fetch_history", name, e)? {
                    CycleControl::SkipLibrary => {
                        summary.libraries_skipped += 1;
                        continue;
                    }
                    CycleControl::EndCycle => break,
                },
            };

            if watched.is_empty() {
                tracing::info!(library = %name, "No watch history to base recommendations on");
                summary.libraries_skipped += 1;
                continue;
            }

            let prompt = build_prompt(&watched, self.config.recommended_amount);
            tracing::info!(library = %name, "Querying model for recommendations");
            let response = match self.recommender.complete(&prompt).await {
                Ok(response) => {
                    tracing::info!("Query success");
                    response
                }
                Err(e) => match apply_policy(self.policy.recommend, "recommend", name, e)? {
                    CycleControl::SkipLibrary => {
                        summary.libraries_skipped += 1;
                        continue;
                    }
                    CycleControl::EndCycle => break,
                },
            };

            let candidates = parse_titles(&response);
            if candidates.is_empty() {
                tracing::info!(library = %name, "Response contained no candidate titles");
                summary.libraries_processed += 1;
                continue;
            }

            tracing::info!(
                candidates = candidates.len(),
                "Finding matching movies in your library"
            );
            let matches = find_matches(self.catalog.as_ref(), &candidates, SEARCH_RESULT_CAP).await;

            let outcome = match upsert_collection(
                self.catalog.as_ref(),
                &section,
                &self.config.collection_title,
                &matches,
                &response,
                self.config.minimum_amount,
            )
            .await
            {
                Ok(outcome) => outcome,
                Err(e) => match apply_policy(self.policy.curate, "curate", name, e)? {
                    CycleControl::SkipLibrary => {
                        summary.libraries_skipped += 1;
                        continue;
                    }
                    CycleControl::EndCycle => break,
                },
            };

            match outcome {
                UpsertOutcome::Created => summary.collections_created += 1,
                UpsertOutcome::Updated => summary.collections_updated += 1,
                UpsertOutcome::Skipped => summary.upserts_skipped += 1,
            }
            summary.libraries_processed += 1;
        }

        Ok(summary)
    }

    async fn fetch_history(&self, name: &str) -> AppResult<(LibrarySection, Vec<String>)> {
        let section = self.catalog.library(name).await?;
        tracing::info!(library = %name, "Fetching items from your watch history");
        let entries = self
            .catalog
            .watch_history(&section, self.config.history_amount)
            .await?;
        let watched: Vec<String> = entries.into_iter().map(|entry| entry.title).collect();
        tracing::info!(
            library = %name,
            watched = %watched.join(", "),
            "Found titles to base recommendations off"
        );
        Ok((section, watched))
    }
}
