/// External collaborator abstractions
///
/// The two remote systems this process talks to sit behind object-safe
/// traits so the orchestration logic can run against mocks. The catalog
/// trait exposes an explicit existence check for collections: "absent"
/// is an `Ok(None)`, never an error dressed up as control flow.
use crate::{
    error::AppResult,
    models::{CollectionHandle, HistoryEntry, LibrarySection, MediaItem},
};

pub mod openai;
pub mod plex;

/// The remote media catalog being searched and curated
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MediaCatalog: Send + Sync {
    /// Proves the configured endpoint and token are usable.
    ///
    /// Called at the start of every cycle; the connection is not reused
    /// across sleeps, so a token rotated mid-run picks up on the next cycle.
    async fn authenticate(&self) -> AppResult<()>;

    /// Looks up a library section by its display name.
    async fn library(&self, name: &str) -> AppResult<LibrarySection>;

    /// Fetches the account's most recent playback records for one section,
    /// newest first, capped at `limit`.
    async fn watch_history(
        &self,
        section: &LibrarySection,
        limit: u32,
    ) -> AppResult<Vec<HistoryEntry>>;

    /// Free-text movie search in the catalog's own relevance order,
    /// capped at `limit` results.
    async fn search_movies(&self, query: &str, limit: u32) -> AppResult<Vec<MediaItem>>;

    /// Looks up a collection by exact title within a section.
    async fn find_collection(
        &self,
        section: &LibrarySection,
        title: &str,
    ) -> AppResult<Option<CollectionHandle>>;

    /// Creates a collection in the section with an initial item set.
    async fn create_collection(
        &self,
        section: &LibrarySection,
        title: &str,
        items: &[MediaItem],
    ) -> AppResult<CollectionHandle>;

    /// Replaces the collection's member set in full.
    async fn replace_collection_items(
        &self,
        collection: &CollectionHandle,
        items: &[MediaItem],
    ) -> AppResult<()>;

    /// Overwrites the collection's summary text.
    async fn set_collection_summary(
        &self,
        collection: &CollectionHandle,
        summary: &str,
    ) -> AppResult<()>;
}

/// The external language-model completion API
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Sends one free-text prompt and returns one free-text completion.
    async fn complete(&self, prompt: &str) -> AppResult<String>;
}
