use serde::Deserialize;

/// Handle to a matched entry in the Plex catalog
///
/// Identity is the catalog-assigned rating key; items are referenced,
/// never owned, by this process.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaItem {
    pub rating_key: String,
    pub title: String,
}

/// Handle to one Plex library section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySection {
    /// Section key, used as `librarySectionID`/`sectionId` in requests
    pub key: String,
    pub title: String,
}

/// Handle to a named collection within a library section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionHandle {
    pub rating_key: String,
    pub title: String,
    /// Key of the owning section, needed for the collection edit endpoint
    pub section_key: String,
}

/// One watch-history playback record, projected down to its title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub title: String,
}

// ============================================================================
// Plex API Types
// ============================================================================
//
// Plex wraps every JSON payload in a top-level `MediaContainer` object.
// Capitalized child keys (`Directory`, `Metadata`, `Hub`, `Account`) are
// arrays that Plex omits entirely when empty, hence the defaults.

/// Top-level envelope around every Plex response
#[derive(Debug, Deserialize)]
pub struct PlexEnvelope<T> {
    #[serde(rename = "MediaContainer")]
    pub media_container: T,
}

/// GET /identity
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexIdentity {
    pub machine_identifier: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// GET /library/sections
#[derive(Debug, Deserialize)]
pub struct PlexDirectoryContainer {
    #[serde(default, rename = "Directory")]
    pub directories: Vec<PlexDirectory>,
}

/// One library section entry
#[derive(Debug, Clone, Deserialize)]
pub struct PlexDirectory {
    pub key: String,
    pub title: String,
    #[serde(default, rename = "type")]
    pub section_type: Option<String>,
}

/// Container for item-level listings (search hubs, collections, children)
#[derive(Debug, Deserialize)]
pub struct PlexMetadataContainer {
    #[serde(default, rename = "Metadata")]
    pub metadata: Vec<PlexMetadata>,
}

/// One catalog item or collection entry
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexMetadata {
    pub rating_key: String,
    pub title: String,
    #[serde(default, rename = "type")]
    pub item_type: Option<String>,
    #[serde(default, rename = "librarySectionID")]
    pub library_section_id: Option<u64>,
}

/// GET /status/sessions/history/all
///
/// History entries for items since deleted from the library can lack a
/// rating key, so they get their own projection instead of `PlexMetadata`.
#[derive(Debug, Deserialize)]
pub struct PlexHistoryContainer {
    #[serde(default, rename = "Metadata")]
    pub metadata: Vec<PlexHistoryMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlexHistoryMetadata {
    pub title: String,
}

/// GET /hubs/search
#[derive(Debug, Deserialize)]
pub struct PlexHubContainer {
    #[serde(default, rename = "Hub")]
    pub hubs: Vec<PlexHub>,
}

/// One result group from the hub search, e.g. the movie hub
#[derive(Debug, Deserialize)]
pub struct PlexHub {
    #[serde(rename = "type")]
    pub hub_type: String,
    #[serde(default, rename = "Metadata")]
    pub metadata: Vec<PlexMetadata>,
}

/// GET /accounts
#[derive(Debug, Deserialize)]
pub struct PlexAccountContainer {
    #[serde(default, rename = "Account")]
    pub accounts: Vec<PlexAccount>,
}

/// Server account entry; id 0 is the synthetic system account
#[derive(Debug, Clone, Deserialize)]
pub struct PlexAccount {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

impl From<PlexMetadata> for MediaItem {
    fn from(metadata: PlexMetadata) -> Self {
        MediaItem {
            rating_key: metadata.rating_key,
            title: metadata.title,
        }
    }
}

impl From<PlexDirectory> for LibrarySection {
    fn from(directory: PlexDirectory) -> Self {
        LibrarySection {
            key: directory.key,
            title: directory.title,
        }
    }
}

impl From<PlexHistoryMetadata> for HistoryEntry {
    fn from(metadata: PlexHistoryMetadata) -> Self {
        HistoryEntry {
            title: metadata.title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_deserialization() {
        let json = r#"{
            "MediaContainer": {
                "machineIdentifier": "abcdef123456",
                "version": "1.40.0.7998"
            }
        }"#;

        let envelope: PlexEnvelope<PlexIdentity> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.media_container.machine_identifier, "abcdef123456");
        assert_eq!(
            envelope.media_container.version,
            Some("1.40.0.7998".to_string())
        );
    }

    #[test]
    fn test_sections_deserialization() {
        let json = r#"{
            "MediaContainer": {
                "Directory": [
                    {"key": "1", "title": "Movies", "type": "movie"},
                    {"key": "2", "title": "TV Shows", "type": "show"}
                ]
            }
        }"#;

        let envelope: PlexEnvelope<PlexDirectoryContainer> = serde_json::from_str(json).unwrap();
        let directories = envelope.media_container.directories;
        assert_eq!(directories.len(), 2);
        assert_eq!(directories[0].key, "1");
        assert_eq!(directories[0].title, "Movies");
        assert_eq!(directories[0].section_type, Some("movie".to_string()));
    }

    #[test]
    fn test_empty_container_defaults() {
        // Plex drops the Metadata key entirely when a listing is empty
        let json = r#"{"MediaContainer": {"size": 0}}"#;

        let envelope: PlexEnvelope<PlexMetadataContainer> = serde_json::from_str(json).unwrap();
        assert!(envelope.media_container.metadata.is_empty());
    }

    #[test]
    fn test_hub_search_deserialization() {
        let json = r#"{
            "MediaContainer": {
                "Hub": [
                    {"type": "movie", "Metadata": [
                        {"ratingKey": "101", "title": "Predator", "type": "movie", "librarySectionID": 1}
                    ]},
                    {"type": "show", "Metadata": [
                        {"ratingKey": "202", "title": "Predators of the Deep", "type": "show"}
                    ]}
                ]
            }
        }"#;

        let envelope: PlexEnvelope<PlexHubContainer> = serde_json::from_str(json).unwrap();
        let hubs = envelope.media_container.hubs;
        assert_eq!(hubs.len(), 2);
        assert_eq!(hubs[0].hub_type, "movie");
        assert_eq!(hubs[0].metadata[0].rating_key, "101");
        assert_eq!(hubs[0].metadata[0].library_section_id, Some(1));
    }

    #[test]
    fn test_history_entry_without_rating_key() {
        let json = r#"{
            "MediaContainer": {
                "Metadata": [
                    {"title": "Alien"},
                    {"title": "Aliens"}
                ]
            }
        }"#;

        let envelope: PlexEnvelope<PlexHistoryContainer> = serde_json::from_str(json).unwrap();
        let entries: Vec<HistoryEntry> = envelope
            .media_container
            .metadata
            .into_iter()
            .map(HistoryEntry::from)
            .collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Alien");
    }

    #[test]
    fn test_accounts_deserialization() {
        let json = r#"{
            "MediaContainer": {
                "Account": [
                    {"id": 0, "name": ""},
                    {"id": 1, "name": "owner"}
                ]
            }
        }"#;

        let envelope: PlexEnvelope<PlexAccountContainer> = serde_json::from_str(json).unwrap();
        let accounts = envelope.media_container.accounts;
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[1].id, 1);
        assert_eq!(accounts[1].name, "owner");
    }

    #[test]
    fn test_metadata_to_media_item() {
        let metadata = PlexMetadata {
            rating_key: "42".to_string(),
            title: "The Thing".to_string(),
            item_type: Some("movie".to_string()),
            library_section_id: Some(1),
        };

        let item: MediaItem = metadata.into();
        assert_eq!(item.rating_key, "42");
        assert_eq!(item.title, "The Thing");
    }
}
