/// Plex Media Server catalog client
///
/// Talks to the Plex HTTP API with token-header auth and JSON responses.
/// Collection membership is edited the way the official clients do it:
/// items are addressed by a `server://` URI built from the machine
/// identifier and comma-joined rating keys.
use crate::{
    error::{AppError, AppResult},
    models::{
        CollectionHandle, HistoryEntry, LibrarySection, MediaItem, PlexAccountContainer,
        PlexDirectoryContainer, PlexEnvelope, PlexHistoryContainer, PlexHubContainer,
        PlexIdentity, PlexMetadata, PlexMetadataContainer,
    },
    services::providers::MediaCatalog,
};
use reqwest::{header::ACCEPT, Client as HttpClient, Method, Response};

const HISTORY_PATH: &str = "/status/sessions/history/all";
/// Plex metadata type id for movies
const MOVIE_TYPE: &str = "1";
/// Plex metadata type id for collections, used by the edit endpoint
const COLLECTION_TYPE: &str = "18";

#[derive(Clone)]
pub struct PlexCatalog {
    http_client: HttpClient,
    base_url: String,
    token: String,
}

impl PlexCatalog {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, format!("{}{}", self.base_url, path))
            .header("X-Plex-Token", &self.token)
            .header(ACCEPT, "application/json")
    }

    async fn check_status(response: Response, context: &str) -> AppResult<Response> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Plex returned status {} for {}: {}",
                status, context, body
            )));
        }
        Ok(response)
    }

    async fn machine_identifier(&self) -> AppResult<String> {
        let response = self.request(Method::GET, "/identity").send().await?;
        let response = Self::check_status(response, "/identity").await?;
        let envelope: PlexEnvelope<PlexIdentity> = response.json().await?;
        Ok(envelope.media_container.machine_identifier)
    }

    /// Account id used to scope history queries
    ///
    /// Plex lists a synthetic system account with id 0 ahead of real
    /// accounts; the first real one is the server owner.
    async fn account_id(&self) -> AppResult<i64> {
        let response = self.request(Method::GET, "/accounts").send().await?;
        let response = Self::check_status(response, "/accounts").await?;
        let envelope: PlexEnvelope<PlexAccountContainer> = response.json().await?;
        envelope
            .media_container
            .accounts
            .iter()
            .find(|account| account.id > 0)
            .map(|account| account.id)
            .ok_or_else(|| AppError::NotFound("No user account on the Plex server".to_string()))
    }

    fn item_uri(machine_identifier: &str, items: &[MediaItem]) -> String {
        let keys: Vec<&str> = items.iter().map(|item| item.rating_key.as_str()).collect();
        format!(
            "server://{}/com.plexapp.plugins.library/library/metadata/{}",
            machine_identifier,
            keys.join(",")
        )
    }

    fn collection_handle(metadata: PlexMetadata, section: &LibrarySection) -> CollectionHandle {
        let section_key = metadata
            .library_section_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| section.key.clone());
        CollectionHandle {
            rating_key: metadata.rating_key,
            title: metadata.title,
            section_key,
        }
    }
}

#[async_trait::async_trait]
impl MediaCatalog for PlexCatalog {
    async fn authenticate(&self) -> AppResult<()> {
        let response = self.request(Method::GET, "/identity").send().await?;
        if !response.status().is_success() {
            return Err(AppError::Auth(format!(
                "Plex rejected the configured token (status {})",
                response.status()
            )));
        }
        let envelope: PlexEnvelope<PlexIdentity> = response.json().await?;
        tracing::debug!(
            machine = %envelope.media_container.machine_identifier,
            "Plex identity verified"
        );
        Ok(())
    }

    async fn library(&self, name: &str) -> AppResult<LibrarySection> {
        let response = self.request(Method::GET, "/library/sections").send().await?;
        let response = Self::check_status(response, "/library/sections").await?;
        let envelope: PlexEnvelope<PlexDirectoryContainer> = response.json().await?;
        envelope
            .media_container
            .directories
            .into_iter()
            .find(|directory| directory.title == name)
            .map(LibrarySection::from)
            .ok_or_else(|| AppError::NotFound(format!("Library section '{}' not found", name)))
    }

    async fn watch_history(
        &self,
        section: &LibrarySection,
        limit: u32,
    ) -> AppResult<Vec<HistoryEntry>> {
        let account_id = self.account_id().await?.to_string();
        let container_size = limit.to_string();
        let response = self
            .request(Method::GET, HISTORY_PATH)
            .query(&[
                ("librarySectionID", section.key.as_str()),
                ("accountID", account_id.as_str()),
                ("X-Plex-Container-Size", container_size.as_str()),
            ])
            .send()
            .await?;
        let response = Self::check_status(response, HISTORY_PATH).await?;
        let envelope: PlexEnvelope<PlexHistoryContainer> = response.json().await?;
        Ok(envelope
            .media_container
            .metadata
            .into_iter()
            .map(HistoryEntry::from)
            .collect())
    }

    async fn search_movies(&self, query: &str, limit: u32) -> AppResult<Vec<MediaItem>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let limit_param = limit.to_string();
        let response = self
            .request(Method::GET, "/hubs/search")
            .query(&[("query", query), ("limit", limit_param.as_str())])
            .send()
            .await?;
        let response = Self::check_status(response, "/hubs/search").await?;
        let envelope: PlexEnvelope<PlexHubContainer> = response.json().await?;

        let items: Vec<MediaItem> = envelope
            .media_container
            .hubs
            .into_iter()
            .find(|hub| hub.hub_type == "movie")
            .map(|hub| {
                hub.metadata
                    .into_iter()
                    .take(limit as usize)
                    .map(MediaItem::from)
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!(query = %query, results = items.len(), "Movie search completed");
        Ok(items)
    }

    async fn find_collection(
        &self,
        section: &LibrarySection,
        title: &str,
    ) -> AppResult<Option<CollectionHandle>> {
        let path = format!("/library/sections/{}/collections", section.key);
        let response = self
            .request(Method::GET, &path)
            .query(&[("title", title)])
            .send()
            .await?;
        let response = Self::check_status(response, "collections listing").await?;
        let envelope: PlexEnvelope<PlexMetadataContainer> = response.json().await?;

        // The title query param is a substring filter server-side; require
        // an exact match so "AI Picks" never resolves to "AI Picks (Old)".
        Ok(envelope
            .media_container
            .metadata
            .into_iter()
            .find(|metadata| metadata.title == title)
            .map(|metadata| Self::collection_handle(metadata, section)))
    }

    async fn create_collection(
        &self,
        section: &LibrarySection,
        title: &str,
        items: &[MediaItem],
    ) -> AppResult<CollectionHandle> {
        let machine_identifier = self.machine_identifier().await?;
        let uri = Self::item_uri(&machine_identifier, items);
        let response = self
            .request(Method::POST, "/library/collections")
            .query(&[
                ("type", MOVIE_TYPE),
                ("title", title),
                ("smart", "0"),
                ("sectionId", section.key.as_str()),
                ("uri", uri.as_str()),
            ])
            .send()
            .await?;
        let response = Self::check_status(response, "collection create").await?;
        let envelope: PlexEnvelope<PlexMetadataContainer> = response.json().await?;

        envelope
            .media_container
            .metadata
            .into_iter()
            .next()
            .map(|metadata| Self::collection_handle(metadata, section))
            .ok_or_else(|| {
                AppError::ExternalApi("Collection create returned no metadata".to_string())
            })
    }

    async fn replace_collection_items(
        &self,
        collection: &CollectionHandle,
        items: &[MediaItem],
    ) -> AppResult<()> {
        // Current members first; Plex has no single replace call.
        let children_path = format!("/library/collections/{}/children", collection.rating_key);
        let response = self.request(Method::GET, &children_path).send().await?;
        let response = Self::check_status(response, "collection children").await?;
        let envelope: PlexEnvelope<PlexMetadataContainer> = response.json().await?;

        for member in envelope.media_container.metadata {
            let path = format!(
                "/library/collections/{}/children/{}",
                collection.rating_key, member.rating_key
            );
            let response = self.request(Method::DELETE, &path).send().await?;
            Self::check_status(response, "collection item removal").await?;
        }

        let machine_identifier = self.machine_identifier().await?;
        let uri = Self::item_uri(&machine_identifier, items);
        let path = format!("/library/collections/{}/items", collection.rating_key);
        let response = self
            .request(Method::PUT, &path)
            .query(&[("uri", uri.as_str())])
            .send()
            .await?;
        Self::check_status(response, "collection item add").await?;
        Ok(())
    }

    async fn set_collection_summary(
        &self,
        collection: &CollectionHandle,
        summary: &str,
    ) -> AppResult<()> {
        let path = format!("/library/sections/{}/all", collection.section_key);
        let response = self
            .request(Method::PUT, &path)
            .query(&[
                ("type", COLLECTION_TYPE),
                ("id", collection.rating_key.as_str()),
                ("summary.value", summary),
            ])
            .send()
            .await?;
        Self::check_status(response, "collection summary edit").await?;
        Ok(())
    }
}
