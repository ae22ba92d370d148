//! Cursor-based pagination over `paging.next` links.
//!
//! Paginated resources embed the URL of the following page in each
//! response. [`Paginator`] follows those links one page at a time; it is
//! single-pass and never restarts.

use async_trait::async_trait;
use futures::stream::{self, Stream};
use url::Url;

use crate::envelope::Envelope;
use crate::error::Result;
use crate::params::Params;

/// Maximum pages to fetch (safety limit).
pub const MAX_PAGES: u32 = 1000;

/// Something that can fetch one page of a paginated resource.
///
/// [`QuantumClient`](crate::QuantumClient) implements this with its retrying
/// GET, so each page gets its own retry budget.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page at `path` with the given parameters.
    async fn fetch_page(&self, path: &str, params: &Params) -> Result<Envelope>;

    /// Path prefix of the versioned API root (e.g. `/v1`), stripped from
    /// cursors that repeat it.
    fn api_prefix(&self) -> &str;
}

/// The next request to make: a path and the merged parameter set.
#[derive(Debug, Clone, PartialEq)]
struct Cursor {
    path: String,
    params: Params,
}

impl Cursor {
    /// Build the cursor for the page `next_url` points at.
    ///
    /// The URL may be absolute or relative to the current path. Its query
    /// string is merged into the current parameters and only its path is
    /// kept.
    fn follow(mut self, next_url: &str, api_prefix: &str) -> Result<Self> {
        let current = Url::parse("http://quantum.invalid/")?.join(&self.path)?;
        let next = current.join(next_url)?;

        let mut path = next.path();
        if !api_prefix.is_empty() {
            if let Some(rest) = path.strip_prefix(api_prefix) {
                if rest.starts_with('/') {
                    path = rest;
                }
            }
        }

        self.path = path.to_string();
        self.params.merge_query_pairs(next.query_pairs());
        Ok(self)
    }
}

/// A lazy, forward-only sequence of response pages.
///
/// Pages are fetched on demand by [`Paginator::next_page`], strictly in
/// order. Dropping the paginator stops any further requests. Once it has
/// returned the last page, or an error, it stays exhausted; fetching the
/// data again means starting a new paginator.
///
/// # Example
///
/// ```no_run
/// use quantumapi::{Network, PostsQuery, QuantumClient};
///
/// # async fn example(client: QuantumClient) -> quantumapi::Result<()> {
/// let mut posts = client.posts(Network::Facebook, 2, 3, &PostsQuery::default())?;
/// while let Some(page) = posts.next_page().await? {
///     println!("{}", page["data"]);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Paginator<'a, S: PageSource + ?Sized = crate::QuantumClient> {
    source: &'a S,
    cursor: Option<Cursor>,
    pages: u32,
    max_pages: u32,
}

impl<S: PageSource + ?Sized> std::fmt::Debug for Paginator<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("cursor", &self.cursor)
            .field("pages", &self.pages)
            .field("max_pages", &self.max_pages)
            .finish_non_exhaustive()
    }
}

impl<'a, S: PageSource + ?Sized> Paginator<'a, S> {
    /// Start a sequence at `path` with `params`.
    pub fn new(source: &'a S, path: impl Into<String>, params: Params) -> Self {
        Self {
            source,
            cursor: Some(Cursor {
                path: path.into(),
                params,
            }),
            pages: 0,
            max_pages: MAX_PAGES,
        }
    }

    /// Lower or raise the page cap. A cap of 0 fetches nothing.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Whether another page may be fetched.
    pub fn has_next(&self) -> bool {
        self.cursor.is_some()
    }

    /// Number of pages returned so far.
    pub fn pages_fetched(&self) -> u32 {
        self.pages
    }

    /// Path and parameters of the next request, if any.
    pub fn next_request(&self) -> Option<(&str, &Params)> {
        self.cursor.as_ref().map(|c| (c.path.as_str(), &c.params))
    }

    /// Fetch the next page.
    ///
    /// Returns `Ok(None)` once the sequence is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the error of the failed page fetch (after its retries). The
    /// sequence ends there. A `paging.next` that cannot be parsed also ends
    /// the sequence, after the page carrying it is returned.
    pub async fn next_page(&mut self) -> Result<Option<Envelope>> {
        let Some(cursor) = self.cursor.take() else {
            return Ok(None);
        };
        if self.pages >= self.max_pages {
            return Ok(None);
        }

        let envelope = self.source.fetch_page(&cursor.path, &cursor.params).await?;
        self.pages += 1;

        if let Some(next_url) = envelope.next_page_url() {
            if self.pages >= self.max_pages {
                tracing::warn!(
                    "Reached pagination limit of {} pages, stopping",
                    self.max_pages
                );
            } else {
                tracing::debug!(page = self.pages, next = next_url, "Following pagination cursor");
                match cursor.follow(next_url, self.source.api_prefix()) {
                    Ok(next) => self.cursor = Some(next),
                    Err(err) => {
                        tracing::warn!(next = next_url, error = %err, "Unusable pagination cursor, stopping");
                    }
                }
            }
        }

        Ok(Some(envelope))
    }

    /// Fetch every remaining page.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    pub async fn collect_all(mut self) -> Result<Vec<Envelope>> {
        let mut pages = Vec::new();
        while let Some(page) = self.next_page().await? {
            pages.push(page);
        }
        Ok(pages)
    }

    /// Turn the paginator into a [`Stream`] of pages.
    pub fn into_stream(self) -> impl Stream<Item = Result<Envelope>> + 'a
    where
        S: 'a,
    {
        stream::try_unfold(self, |mut paginator| async move {
            Ok(paginator
                .next_page()
                .await?
                .map(|page| (page, paginator)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuantumError;
    use futures::TryStreamExt;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses and records the requests it saw.
    struct Scripted {
        responses: Mutex<VecDeque<Result<Envelope>>>,
        requests: Mutex<Vec<(String, Params)>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<serde_json::Value>>) -> Self {
            Self {
                responses: Mutex::new(
                    responses
                        .into_iter()
                        .map(|r| r.map(Envelope::new))
                        .collect(),
                ),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<(String, Params)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageSource for Scripted {
        async fn fetch_page(&self, path: &str, params: &Params) -> Result<Envelope> {
            self.requests
                .lock()
                .unwrap()
                .push((path.to_string(), params.clone()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no more scripted responses")
        }

        fn api_prefix(&self) -> &str {
            "/v1"
        }
    }

    const POSTS: &str = "/accounts/1/projects/2/facebook/profiles/3/posts";

    #[tokio::test]
    async fn test_two_pages_then_end() {
        let source = Scripted::new(vec![
            Ok(json!({
                "data": [{"id": "p1"}],
                "paging": { "next": format!("{POSTS}?since=2015-01-01&page=2") }
            })),
            Ok(json!({ "data": [{"id": "p2"}] })),
        ]);

        let mut paginator = Paginator::new(&source, POSTS, Params::new().with("since", "2015-01-01"));
        assert!(paginator.has_next());

        let first = paginator.next_page().await.unwrap().unwrap();
        assert_eq!(first["data"][0]["id"], "p1");
        assert!(paginator.has_next());

        let second = paginator.next_page().await.unwrap().unwrap();
        assert_eq!(second["data"][0]["id"], "p2");
        assert!(!paginator.has_next());

        assert!(paginator.next_page().await.unwrap().is_none());
        assert_eq!(paginator.pages_fetched(), 2);

        let requests = source.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].0, POSTS);
        assert_eq!(requests[1].1.get("page"), Some(&json!("2")));
        assert_eq!(requests[1].1.get("since"), Some(&json!("2015-01-01")));
    }

    #[tokio::test]
    async fn test_absolute_cursor_strips_api_prefix() {
        let source = Scripted::new(vec![
            Ok(json!({
                "paging": { "next": format!("https://api.quantum.socialmetrix.com/v1{POSTS}?cursor=abc") }
            })),
            Ok(json!({ "paging": {} })),
        ]);

        let pages = Paginator::new(&source, POSTS, Params::new())
            .collect_all()
            .await
            .unwrap();
        assert_eq!(pages.len(), 2);

        let requests = source.requests();
        assert_eq!(requests[1].0, POSTS);
        assert_eq!(requests[1].1.get("cursor"), Some(&json!("abc")));
    }

    #[tokio::test]
    async fn test_array_page_ends_sequence() {
        let source = Scripted::new(vec![Ok(json!([1, 2, 3]))]);
        let mut paginator = Paginator::new(&source, "/x", Params::new());

        assert!(paginator.next_page().await.unwrap().is_some());
        assert!(!paginator.has_next());
    }

    #[tokio::test]
    async fn test_error_ends_sequence() {
        let source = Scripted::new(vec![
            Ok(json!({ "paging": { "next": "/x?page=2" } })),
            Err(QuantumError::InternalServer("Internal server error".into())),
        ]);
        let mut paginator = Paginator::new(&source, "/x", Params::new());

        assert!(paginator.next_page().await.unwrap().is_some());
        assert!(matches!(
            paginator.next_page().await,
            Err(QuantumError::InternalServer(_))
        ));
        assert!(!paginator.has_next());
        assert!(paginator.next_page().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_page_cap_stops_looping_server() {
        let looping = || Ok(json!({ "paging": { "next": "/x?page=1" } }));
        let source = Scripted::new((0..5).map(|_| looping()).collect());

        let pages = Paginator::new(&source, "/x", Params::new())
            .with_max_pages(3)
            .collect_all()
            .await
            .unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(source.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_into_stream() {
        let source = Scripted::new(vec![
            Ok(json!({ "n": 1, "paging": { "next": "/x?page=2" } })),
            Ok(json!({ "n": 2, "paging": { "next": "/x?page=3" } })),
            Ok(json!({ "n": 3 })),
        ]);

        let pages: Vec<Envelope> = Paginator::new(&source, "/x", Params::new())
            .into_stream()
            .try_collect()
            .await
            .unwrap();
        let numbers: Vec<_> = pages.iter().map(|p| p["n"].to_string()).collect();
        assert_eq!(numbers, ["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_unparseable_cursor_keeps_page_and_ends() {
        let source = Scripted::new(vec![Ok(json!({
            "data": [1],
            "paging": { "next": "http://" }
        }))]);

        let mut paginator = Paginator::new(&source, "/x", Params::new());
        let page = paginator.next_page().await.unwrap().unwrap();
        assert_eq!(page["data"][0], 1);
        assert!(!paginator.has_next());
        assert!(paginator.next_page().await.unwrap().is_none());
        assert_eq!(source.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_page_cap_fetches_nothing() {
        let source = Scripted::new(vec![]);

        let pages = Paginator::new(&source, "/x", Params::new())
            .with_max_pages(0)
            .collect_all()
            .await
            .unwrap();
        assert!(pages.is_empty());
        assert!(source.requests().is_empty());
    }

    #[tokio::test]
    async fn test_query_only_cursor_refetches_current_path() {
        let source = Scripted::new(vec![
            Ok(json!({ "data": [1], "paging": { "next": "?page=2" } })),
            Ok(json!({ "data": [2] })),
        ]);

        let pages = Paginator::new(&source, POSTS, Params::new().with("limit", 1))
            .collect_all()
            .await
            .unwrap();
        assert_eq!(pages.len(), 2);

        let requests = source.requests();
        assert_eq!(requests[1].0, POSTS);
        assert_eq!(requests[1].1.get("page"), Some(&json!("2")));
        assert_eq!(requests[1].1.get("limit"), Some(&json!(1)));
    }

    #[test]
    fn test_cursor_follow_resolves_against_current_path() {
        let cursor = Cursor {
            path: "/accounts/1/projects".into(),
            params: Params::new(),
        };
        let next = cursor.follow("4?page=2", "/v1").unwrap();
        assert_eq!(next.path, "/accounts/1/4");
    }

    #[test]
    fn test_cursor_follow_relative_without_slash() {
        let cursor = Cursor {
            path: "/x".into(),
            params: Params::new(),
        };
        let next = cursor.follow("accounts/1/projects?page=2", "/v1").unwrap();
        assert_eq!(next.path, "/accounts/1/projects");
        assert_eq!(next.params.get("page"), Some(&json!("2")));
    }

    #[test]
    fn test_cursor_follow_keeps_lookalike_prefix() {
        let cursor = Cursor {
            path: "/x".into(),
            params: Params::new(),
        };
        let next = cursor.follow("/v1beta/things", "/v1").unwrap();
        assert_eq!(next.path, "/v1beta/things");
    }
}
