use crate::{
    error::AppResult,
    models::{LibrarySection, MediaItem},
    services::providers::MediaCatalog,
};

/// What the upsert engine did with one cycle's matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// An existing collection had its member set replaced in full
    Updated,
    /// No collection existed under the configured title; one was created
    Created,
    /// Too few matches; the collection was left untouched
    Skipped,
}

/// Creates or rebuilds the curated collection from this cycle's matches
///
/// The minimum gate is strict: exactly `minimum` matches is not enough.
/// Existence is an explicit check: only a genuine absence falls through
/// to creation, and any transport error propagates to the caller instead
/// of silently creating a duplicate collection.
///
/// An update is a full replace, not a merge: members not in `items` are
/// removed, and any manual curation of the collection is lost.
pub async fn upsert_collection(
    catalog: &dyn MediaCatalog,
    section: &LibrarySection,
    title: &str,
    items: &[MediaItem],
    summary: &str,
    minimum: usize,
) -> AppResult<UpsertOutcome> {
    if items.len() <= minimum {
        tracing::info!(
            matched = items.len(),
            minimum = minimum,
            "Not enough matching movies were found"
        );
        return Ok(UpsertOutcome::Skipped);
    }

    match catalog.find_collection(section, title).await? {
        Some(collection) => {
            catalog.replace_collection_items(&collection, items).await?;
            catalog.set_collection_summary(&collection, summary).await?;
            tracing::info!(
                collection = %collection.title,
                items = items.len(),
                "Updated pre-existing collection"
            );
            Ok(UpsertOutcome::Updated)
        }
        None => {
            let collection = catalog.create_collection(section, title, items).await?;
            catalog.set_collection_summary(&collection, summary).await?;
            tracing::info!(
                collection = %collection.title,
                items = items.len(),
                "Added new collection"
            );
            Ok(UpsertOutcome::Created)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::CollectionHandle;
    use crate::services::providers::MockMediaCatalog;
    use mockall::predicate::eq;

    fn section() -> LibrarySection {
        LibrarySection {
            key: "1".to_string(),
            title: "Movies".to_string(),
        }
    }

    fn items(n: usize) -> Vec<MediaItem> {
        (0..n)
            .map(|i| MediaItem {
                rating_key: format!("{}", 100 + i),
                title: format!("Movie {}", i),
            })
            .collect()
    }

    fn handle() -> CollectionHandle {
        CollectionHandle {
            rating_key: "500".to_string(),
            title: "AI Picks".to_string(),
            section_key: "1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_exactly_at_threshold_is_insufficient() {
        // No expectations set: any catalog call would panic the mock.
        let catalog = MockMediaCatalog::new();

        let matched = items(3);
        let outcome = upsert_collection(&catalog, &section(), "AI Picks", &matched, "desc", 3)
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_one_above_threshold_mutates() {
        let mut catalog = MockMediaCatalog::new();
        catalog
            .expect_find_collection()
            .times(1)
            .returning(|_, _| Ok(Some(handle())));
        catalog
            .expect_replace_collection_items()
            .times(1)
            .returning(|_, _| Ok(()));
        catalog
            .expect_set_collection_summary()
            .with(eq(handle()), eq("desc"))
            .times(1)
            .returning(|_, _| Ok(()));

        let matched = items(4);
        let outcome = upsert_collection(&catalog, &section(), "AI Picks", &matched, "desc", 3)
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);
    }

    #[tokio::test]
    async fn test_update_replaces_with_exactly_the_new_set() {
        let matched = items(2);
        let expected = matched.clone();

        let mut catalog = MockMediaCatalog::new();
        catalog
            .expect_find_collection()
            .returning(|_, _| Ok(Some(handle())));
        catalog
            .expect_replace_collection_items()
            .withf(move |_, replacement| replacement == expected.as_slice())
            .times(1)
            .returning(|_, _| Ok(()));
        catalog
            .expect_set_collection_summary()
            .returning(|_, _| Ok(()));

        let outcome = upsert_collection(&catalog, &section(), "AI Picks", &matched, "desc", 1)
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);
    }

    #[tokio::test]
    async fn test_absent_collection_is_created() {
        let mut catalog = MockMediaCatalog::new();
        catalog.expect_find_collection().returning(|_, _| Ok(None));
        catalog
            .expect_create_collection()
            .withf(|sec, title, initial| {
                sec.key == "1" && title == "AI Picks" && initial.len() == 2
            })
            .times(1)
            .returning(|_, _, _| Ok(handle()));
        catalog
            .expect_set_collection_summary()
            .with(eq(handle()), eq("desc"))
            .times(1)
            .returning(|_, _| Ok(()));

        let matched = items(2);
        let outcome = upsert_collection(&catalog, &section(), "AI Picks", &matched, "desc", 1)
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Created);
    }

    #[tokio::test]
    async fn test_lookup_error_propagates_instead_of_creating() {
        let mut catalog = MockMediaCatalog::new();
        catalog
            .expect_find_collection()
            .returning(|_, _| Err(AppError::ExternalApi("transient".to_string())));
        catalog.expect_create_collection().times(0);

        let matched = items(2);
        let result = upsert_collection(&catalog, &section(), "AI Picks", &matched, "desc", 1).await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[tokio::test]
    async fn test_zero_minimum_with_one_match_mutates() {
        let mut catalog = MockMediaCatalog::new();
        catalog.expect_find_collection().returning(|_, _| Ok(None));
        catalog
            .expect_create_collection()
            .returning(|_, _, _| Ok(handle()));
        catalog
            .expect_set_collection_summary()
            .returning(|_, _| Ok(()));

        let matched = items(1);
        let outcome = upsert_collection(&catalog, &section(), "AI Picks", &matched, "desc", 0)
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Created);
    }
}
