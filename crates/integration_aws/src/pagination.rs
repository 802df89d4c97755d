//! Paged listings
//!
//! Provider list calls return one page at a time plus an opaque token for
//! the next page. [`paginate`] turns such a call into a lazy stream of pages
//! that ends when no further token is returned.

use std::future::Future;

use futures::stream::{self, Stream, TryStreamExt};

use crate::error::AwsError;

/// One page of a provider listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Token for the following page, `None` on the last page
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// The final page of a listing
    #[must_use]
    pub const fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }

    /// A page followed by the page identified by `next_token`
    #[must_use]
    pub fn with_next(items: Vec<T>, next_token: impl Into<String>) -> Self {
        Self {
            items,
            next_token: Some(next_token.into()),
        }
    }

    /// Token of the next page; empty tokens mark the end as well
    #[must_use]
    pub fn next_page_token(&self) -> Option<&str> {
        self.next_token.as_deref().filter(|t| !t.is_empty())
    }
}

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Lazily walk a paged listing
///
/// `fetch` receives the token of the page to load (`None` for the first
/// page). The stream yields pages until one comes back without a next token,
/// and ends after the first error. Each call starts again from the first page.
pub fn paginate<T, F, Fut>(fetch: F) -> impl Stream<Item = Result<Page<T>, AwsError>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, AwsError>>,
{
    stream::try_unfold((Cursor::Start, fetch), |(cursor, mut fetch)| async move {
        let token = match cursor {
            Cursor::Start => None,
            Cursor::Next(token) => Some(token),
            Cursor::Done => return Ok(None),
        };

        let page = fetch(token).await?;
        let next = page
            .next_page_token()
            .map_or(Cursor::Done, |t| Cursor::Next(t.to_string()));
        Ok(Some((page, (next, fetch))))
    })
}

/// Drain a page stream into a flat list of items
///
/// # Errors
///
/// Returns the first error produced by the stream.
pub async fn collect_items<T, S>(pages: S) -> Result<Vec<T>, AwsError>
where
    S: Stream<Item = Result<Page<T>, AwsError>>,
{
    pages
        .map_ok(|page| stream::iter(page.items.into_iter().map(Ok::<T, AwsError>)))
        .try_flatten()
        .try_collect()
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::stream::StreamExt;

    use super::*;

    fn numbered_pages(calls: Arc<AtomicUsize>) -> impl Stream<Item = Result<Page<u32>, AwsError>> {
        paginate(move |token: Option<String>| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                match token.as_deref() {
                    None => Ok(Page::with_next(vec![1, 2], "p2")),
                    Some("p2") => Ok(Page::with_next(vec![3], "p3")),
                    Some("p3") => Ok(Page::last(vec![4, 5])),
                    Some(other) => Err(AwsError::RequestFailed(format!("bad token {other}"))),
                }
            }
        })
    }

    #[tokio::test]
    async fn test_collects_all_pages() {
        let calls = Arc::new(AtomicUsize::new(0));
        let items = collect_items(numbered_pages(Arc::clone(&calls))).await.unwrap();
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_is_lazy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pages = numbered_pages(Arc::clone(&calls));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let first: Vec<_> = pages.take(1).collect().await;
        assert_eq!(first.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_restarts_from_first_page() {
        let calls = Arc::new(AtomicUsize::new(0));
        let first = collect_items(numbered_pages(Arc::clone(&calls))).await.unwrap();
        let second = collect_items(numbered_pages(Arc::clone(&calls))).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn test_empty_token_ends_listing() {
        let pages = paginate(|_token: Option<String>| async {
            Ok::<_, AwsError>(Page::with_next(vec!["only"], ""))
        });
        let items = collect_items(pages).await.unwrap();
        assert_eq!(items, vec!["only"]);
    }

    #[tokio::test]
    async fn test_stops_after_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let pages = paginate(move |_token: Option<String>| {
            counter.fetch_add(1, Ordering::SeqCst);
            async {
                Err::<Page<u32>, _>(AwsError::ConnectionFailed("refused".to_string()))
            }
        });

        let results: Vec<_> = pages.collect().await;
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
