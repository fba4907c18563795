//! Link creation, lookup and statistics service.

use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{ClickSink, LinkStore};
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, SHORT_CODE_LENGTH};
use crate::utils::url_validator::validate_long_url;
use serde_json::json;
use tracing::{info, warn};

/// Number of codes tried before [`AppError::CodeGenerationExhausted`].
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Short code used to probe store connectivity. Its presence is irrelevant.
const PROBE_CODE: &str = "000000";

/// A link together with its persisted click count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStats {
    pub link: Link,
    pub total_clicks: i64,
}

/// Service for creating and retrieving shortened links.
///
/// Generic over the store types so it can run on concrete stores, trait
/// objects (`LinkService<dyn LinkStore, dyn ClickSink>`) or mocks.
pub struct LinkService<L: LinkStore + ?Sized, C: ClickSink + ?Sized> {
    link_store: Arc<L>,
    click_sink: Arc<C>,
    code_generator: CodeGenerator,
}

impl<L: LinkStore + ?Sized, C: ClickSink + ?Sized> LinkService<L, C> {
    /// Creates a new link service backed by the OS entropy source.
    pub fn new(link_store: Arc<L>, click_sink: Arc<C>) -> Self {
        Self {
            link_store,
            click_sink,
            code_generator: CodeGenerator::default(),
        }
    }

    /// Replaces the code generator.
    pub fn with_code_generator(mut self, code_generator: CodeGenerator) -> Self {
        self.code_generator = code_generator;
        self
    }

    /// Creates a short link for `long_url`.
    ///
    /// # Code Generation
    ///
    /// Generates a random 6-character code and checks the store for an
    /// existing link with that code before inserting. A taken code, or a
    /// unique-constraint [`AppError::Conflict`] from the insert (two
    /// creations racing for the same code), triggers a retry with a fresh
    /// code, up to [`MAX_CODE_ATTEMPTS`] in total.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidInput`] if the URL is empty or not an absolute HTTP(S) URL
    /// - [`AppError::CodeGenerationExhausted`] if every attempt collided
    /// - [`AppError::StoreFailure`] on any other store error (no retry)
    /// - [`AppError::RandomSourceFailure`] if the entropy source fails
    pub async fn create_link(&self, long_url: &str) -> Result<Link, AppError> {
        validate_long_url(long_url).map_err(|e| {
            AppError::invalid_input(
                "Invalid URL",
                json!({ "long_url": long_url, "reason": e.to_string() }),
            )
        })?;

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let short_code = self.code_generator.generate(SHORT_CODE_LENGTH)?;

            if self
                .link_store
                .find_by_short_code(&short_code)
                .await?
                .is_some()
            {
                warn!(
                    %short_code,
                    attempt,
                    max_attempts = MAX_CODE_ATTEMPTS,
                    "Short code already exists, retrying"
                );
                continue;
            }

            let new_link = NewLink {
                short_code,
                long_url: long_url.to_string(),
            };

            match self.link_store.create(new_link).await {
                Ok(link) => {
                    info!(link_id = link.id, short_code = %link.short_code, "Link created");
                    return Ok(link);
                }
                Err(AppError::Conflict { details, .. }) => {
                    warn!(
                        attempt,
                        max_attempts = MAX_CODE_ATTEMPTS,
                        %details,
                        "Short code taken by a concurrent insert, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::CodeGenerationExhausted {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }

    /// Retrieves a link by its exact short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::StoreFailure`] on store errors.
    pub async fn get_link_by_short_code(&self, short_code: &str) -> Result<Link, AppError> {
        self.link_store
            .find_by_short_code(short_code)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "short_code": short_code }))
            })
    }

    /// Retrieves a link and its total click count.
    ///
    /// A link with no recorded clicks reports `total_clicks == 0`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::StoreFailure`] on store errors.
    pub async fn get_link_stats(&self, short_code: &str) -> Result<LinkStats, AppError> {
        let link = self.get_link_by_short_code(short_code).await?;
        let total_clicks = self.click_sink.count_by_link_id(link.id).await?;

        Ok(LinkStats { link, total_clicks })
    }

    /// Lists every link, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreFailure`] on store errors.
    pub async fn list_links(&self) -> Result<Vec<Link>, AppError> {
        self.link_store.list_all().await
    }

    /// Issues a cheap lookup to confirm the link store answers.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreFailure`] if the store is unreachable.
    pub async fn check_store(&self) -> Result<(), AppError> {
        self.link_store.find_by_short_code(PROBE_CODE).await.map(|_| ())
    }

    /// Constructs the full short URL from the public base URL and a code.
    pub fn short_url(&self, base_url: &str, short_code: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), short_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockClickSink, MockLinkStore};
    use crate::utils::code_generator::{ALPHABET, EntropySource};
    use chrono::Utc;

    fn create_test_link(id: i64, code: &str, url: &str) -> Link {
        Link::new(id, code.to_string(), url.to_string(), Utc::now())
    }

    fn created(new_link: NewLink) -> Result<Link, AppError> {
        Ok(Link::new(
            10,
            new_link.short_code,
            new_link.long_url,
            Utc::now(),
        ))
    }

    fn service(
        link_store: MockLinkStore,
        click_sink: MockClickSink,
    ) -> LinkService<MockLinkStore, MockClickSink> {
        LinkService::new(Arc::new(link_store), Arc::new(click_sink))
    }

    struct FailingEntropy;

    impl EntropySource for FailingEntropy {
        fn fill(&self, _dest: &mut [u8]) -> Result<(), AppError> {
            Err(AppError::RandomSourceFailure {
                reason: "entropy pool unavailable".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_create_link_success() {
        let mut link_store = MockLinkStore::new();

        link_store
            .expect_find_by_short_code()
            .times(1)
            .returning(|_| Ok(None));

        link_store
            .expect_create()
            .withf(|new_link| {
                new_link.long_url == "https://example.com/a"
                    && new_link.short_code.len() == SHORT_CODE_LENGTH
                    && new_link.short_code.bytes().all(|b| ALPHABET.contains(&b))
            })
            .times(1)
            .returning(created);

        let service = service(link_store, MockClickSink::new());

        let link = service.create_link("https://example.com/a").await.unwrap();

        assert_eq!(link.long_url, "https://example.com/a");
        assert_eq!(link.short_code.len(), 6);
    }

    #[tokio::test]
    async fn test_create_link_retries_on_existing_code() {
        let mut link_store = MockLinkStore::new();

        let existing = create_test_link(5, "taken1", "https://other.com");
        let mut lookups = 0;
        link_store
            .expect_find_by_short_code()
            .times(3)
            .returning(move |_| {
                lookups += 1;
                if lookups < 3 {
                    Ok(Some(existing.clone()))
                } else {
                    Ok(None)
                }
            });

        link_store.expect_create().times(1).returning(created);

        let service = service(link_store, MockClickSink::new());

        let result = service.create_link("https://example.com").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_link_exhausts_after_five_collisions() {
        let mut link_store = MockLinkStore::new();

        let existing = create_test_link(5, "taken1", "https://other.com");
        link_store
            .expect_find_by_short_code()
            .times(MAX_CODE_ATTEMPTS)
            .returning(move |_| Ok(Some(existing.clone())));

        link_store.expect_create().times(0);

        let service = service(link_store, MockClickSink::new());

        let result = service.create_link("https://example.com").await;

        assert!(matches!(
            result,
            Err(AppError::CodeGenerationExhausted { attempts: 5 })
        ));
    }

    #[tokio::test]
    async fn test_create_link_retries_on_insert_conflict() {
        let mut link_store = MockLinkStore::new();

        link_store
            .expect_find_by_short_code()
            .times(2)
            .returning(|_| Ok(None));

        let mut inserts = 0;
        link_store.expect_create().times(2).returning(move |new_link| {
            inserts += 1;
            if inserts == 1 {
                Err(AppError::conflict(
                    "Unique constraint violation",
                    json!({ "constraint": "links_short_code_key" }),
                ))
            } else {
                created(new_link)
            }
        });

        let service = service(link_store, MockClickSink::new());

        let result = service.create_link("https://example.com").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_link_aborts_on_lookup_failure() {
        let mut link_store = MockLinkStore::new();

        link_store
            .expect_find_by_short_code()
            .times(1)
            .returning(|_| Err(AppError::store("find link", "connection refused")));

        link_store.expect_create().times(0);

        let service = service(link_store, MockClickSink::new());

        let result = service.create_link("https://example.com").await;

        assert!(matches!(result, Err(AppError::StoreFailure { .. })));
    }

    #[tokio::test]
    async fn test_create_link_aborts_on_insert_failure() {
        let mut link_store = MockLinkStore::new();

        link_store
            .expect_find_by_short_code()
            .times(1)
            .returning(|_| Ok(None));

        link_store
            .expect_create()
            .times(1)
            .returning(|_| Err(AppError::store("insert link", "disk full")));

        let service = service(link_store, MockClickSink::new());

        let result = service.create_link("https://example.com").await;

        assert!(matches!(result, Err(AppError::StoreFailure { .. })));
    }

    #[tokio::test]
    async fn test_create_link_invalid_url() {
        let mut link_store = MockLinkStore::new();
        link_store.expect_find_by_short_code().times(0);
        link_store.expect_create().times(0);

        let service = service(link_store, MockClickSink::new());

        for input in ["", "not-a-url", "ftp://example.com"] {
            let result = service.create_link(input).await;
            assert!(
                matches!(result, Err(AppError::InvalidInput { .. })),
                "{input:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_create_link_entropy_failure() {
        let mut link_store = MockLinkStore::new();
        link_store.expect_find_by_short_code().times(0);

        let service = service(link_store, MockClickSink::new())
            .with_code_generator(CodeGenerator::new(Arc::new(FailingEntropy)));

        let result = service.create_link("https://example.com").await;

        assert!(matches!(result, Err(AppError::RandomSourceFailure { .. })));
    }

    #[tokio::test]
    async fn test_get_link_by_short_code_found() {
        let mut link_store = MockLinkStore::new();

        let link = create_test_link(3, "aB3xY9", "https://example.com");
        link_store
            .expect_find_by_short_code()
            .withf(|code| code == "aB3xY9")
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        let service = service(link_store, MockClickSink::new());

        let found = service.get_link_by_short_code("aB3xY9").await.unwrap();

        assert_eq!(found.id, 3);
        assert_eq!(found.long_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_get_link_by_short_code_not_found() {
        let mut link_store = MockLinkStore::new();
        link_store
            .expect_find_by_short_code()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(link_store, MockClickSink::new());

        let result = service.get_link_by_short_code("nope00").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_link_stats_zero_clicks() {
        let mut link_store = MockLinkStore::new();
        let mut click_sink = MockClickSink::new();

        let link = create_test_link(8, "quiet1", "https://example.com");
        link_store
            .expect_find_by_short_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        click_sink
            .expect_count_by_link_id()
            .withf(|id| *id == 8)
            .times(1)
            .returning(|_| Ok(0));

        let service = service(link_store, click_sink);

        let stats = service.get_link_stats("quiet1").await.unwrap();

        assert_eq!(stats.total_clicks, 0);
        assert_eq!(stats.link.short_code, "quiet1");
    }

    #[tokio::test]
    async fn test_get_link_stats_not_found_skips_count() {
        let mut link_store = MockLinkStore::new();
        let mut click_sink = MockClickSink::new();

        link_store
            .expect_find_by_short_code()
            .times(1)
            .returning(|_| Ok(None));
        click_sink.expect_count_by_link_id().times(0);

        let service = service(link_store, click_sink);

        let result = service.get_link_stats("ghost1").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_link_stats_propagates_count_failure() {
        let mut link_store = MockLinkStore::new();
        let mut click_sink = MockClickSink::new();

        let link = create_test_link(8, "busy01", "https://example.com");
        link_store
            .expect_find_by_short_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));
        click_sink
            .expect_count_by_link_id()
            .times(1)
            .returning(|_| Err(AppError::store("count clicks", "timeout")));

        let service = service(link_store, click_sink);

        let result = service.get_link_stats("busy01").await;

        assert!(matches!(result, Err(AppError::StoreFailure { .. })));
    }

    #[tokio::test]
    async fn test_list_links() {
        let mut link_store = MockLinkStore::new();

        let links = vec![
            create_test_link(1, "first1", "https://a.com"),
            create_test_link(2, "secnd2", "https://b.com"),
        ];
        link_store
            .expect_list_all()
            .times(1)
            .returning(move || Ok(links.clone()));

        let service = service(link_store, MockClickSink::new());

        let listed = service.list_links().await.unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].short_code, "secnd2");
    }

    #[tokio::test]
    async fn test_check_store_ignores_lookup_result() {
        let mut link_store = MockLinkStore::new();
        link_store
            .expect_find_by_short_code()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(link_store, MockClickSink::new());

        assert!(service.check_store().await.is_ok());
    }

    #[test]
    fn test_short_url() {
        let service = service(MockLinkStore::new(), MockClickSink::new());

        assert_eq!(
            service.short_url("http://localhost:8080/", "aB3xY9"),
            "http://localhost:8080/aB3xY9"
        );
        assert_eq!(
            service.short_url("https://s.example.com", "aB3xY9"),
            "https://s.example.com/aB3xY9"
        );
    }
}
