//! Accumulates a paged list endpoint into one result.
//!
//! The first page's reported total is authoritative; later pages are
//! fetched at `iteration * page_size` until the accumulated length reaches
//! it. Pages are appended in fetch order and never reordered or
//! deduplicated.

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

use crate::api::types::{FavoriteQuestionList, ProblemPage, Question};
use crate::error::{ApiError, PaginateError};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_THROTTLE: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(2);
pub const DEFAULT_SLACK_PAGES: usize = 2;

/// One fetched page: its records and the total the server reported.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub questions: Vec<Question>,
    pub total: usize,
}

impl From<FavoriteQuestionList> for Page {
    fn from(list: FavoriteQuestionList) -> Self {
        Self {
            questions: list.questions,
            total: list.total_length,
        }
    }
}

impl From<ProblemPage> for Page {
    fn from(page: ProblemPage) -> Self {
        Self {
            questions: page.questions,
            total: page.total,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Paginator {
    page_size: usize,
    throttle: Duration,
    max_attempts: u32,
    retry_backoff: Duration,
    slack_pages: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            throttle: DEFAULT_THROTTLE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            slack_pages: DEFAULT_SLACK_PAGES,
        }
    }

    /// Pause before every page after the first.
    #[must_use]
    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Attempts per page before giving up, and the backoff unit between
    /// them (attempt `n` waits `n * backoff`).
    #[must_use]
    pub fn with_retries(mut self, max_attempts: u32, backoff: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_backoff = backoff;
        self
    }

    /// Most page fetches allowed for a reported `total`.
    pub fn page_budget(&self, total: usize) -> usize {
        total.div_ceil(self.page_size) + self.slack_pages
    }

    /// Fetches pages via `fetch(skip, limit)` until the reported total is
    /// reached.
    ///
    /// A page that keeps failing aborts the run, as does exceeding
    /// [`Paginator::page_budget`]. Either error carries the records
    /// accumulated so far.
    pub async fn accumulate<F, Fut>(
        &self,
        label: &str,
        mut fetch: F,
    ) -> Result<FavoriteQuestionList, PaginateError>
    where
        F: FnMut(usize, usize) -> Fut,
        Fut: Future<Output = Result<Page, ApiError>>,
    {
        let mut acc = FavoriteQuestionList::default();

        let first = self.fetch_page(&mut fetch, 0, &acc).await?;
        let total = first.total;
        acc.total_length = total;
        acc.questions.extend(first.questions);
        info!(
            "[{label}] page 1: {}/{} questions (skip=0)",
            acc.questions.len(),
            total
        );

        let budget = self.page_budget(total);
        let mut fetched_pages = 1;
        let mut iteration = 1;

        while acc.questions.len() < total {
            if fetched_pages >= budget {
                acc.has_more = true;
                return Err(PaginateError::PageBudgetExhausted {
                    total,
                    fetched_pages,
                    partial: Box::new(acc),
                });
            }

            tokio::time::sleep(self.throttle).await;

            let skip = iteration * self.page_size;
            let page = self.fetch_page(&mut fetch, skip, &acc).await?;
            acc.questions.extend(page.questions);
            fetched_pages += 1;
            iteration += 1;

            info!(
                "[{label}] page {fetched_pages}: {}/{} questions (skip={skip})",
                acc.questions.len(),
                total
            );
        }

        acc.has_more = false;
        Ok(acc)
    }

    async fn fetch_page<F, Fut>(
        &self,
        fetch: &mut F,
        skip: usize,
        acc: &FavoriteQuestionList,
    ) -> Result<Page, PaginateError>
    where
        F: FnMut(usize, usize) -> Fut,
        Fut: Future<Output = Result<Page, ApiError>>,
    {
        let mut attempt = 1;
        loop {
            match fetch(skip, self.page_size).await {
                Ok(page) => return Ok(page),
                Err(e) if attempt < self.max_attempts => {
                    warn!(skip, attempt, "page fetch failed, retrying: {e}");
                    tokio::time::sleep(self.retry_backoff.saturating_mul(attempt)).await;
                    attempt += 1;
                }
                Err(e) => {
                    let mut partial = acc.clone();
                    partial.has_more = true;
                    return Err(PaginateError::Page {
                        skip,
                        attempts: attempt,
                        partial: Box::new(partial),
                        source: e,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::LeetCodeClient;
    use crate::api::client::fake::{FakeTransport, favorite_page};
    use crate::api::types::Difficulty;
    use std::future::ready;

    fn question(slug: &str) -> Question {
        Question {
            id: 0,
            question_frontend_id: slug.to_string(),
            title: slug.to_string(),
            title_slug: slug.to_string(),
            translated_title: None,
            difficulty: Difficulty::Medium,
            status: None,
            paid_only: false,
            is_in_my_favorites: false,
            ac_rate: 0.0,
            frequency: None,
            topic_tags: Vec::new(),
        }
    }

    fn catalog(n: usize) -> Vec<Question> {
        (0..n).map(|i| question(&format!("q-{i}"))).collect()
    }

    /// Serves `records` in pages while claiming `reported` as the total.
    fn serve(records: &[Question], reported: usize, skip: usize, limit: usize) -> Page {
        let start = skip.min(records.len());
        let end = (skip + limit).min(records.len());
        Page {
            questions: records[start..end].to_vec(),
            total: reported,
        }
    }

    fn quick(page_size: usize) -> Paginator {
        Paginator::new(page_size)
            .with_throttle(Duration::ZERO)
            .with_retries(3, Duration::ZERO)
    }

    #[tokio::test]
    async fn twenty_five_records_in_pages_of_ten() {
        let records = catalog(25);
        let mut skips = Vec::new();

        let result = quick(10)
            .accumulate("test", |skip, limit| {
                skips.push(skip);
                ready(Ok(serve(&records, 25, skip, limit)))
            })
            .await
            .unwrap();

        assert_eq!(skips, vec![0, 10, 20]);
        assert_eq!(result.questions.len(), 25);
        assert_eq!(result.total_length, 25);
        assert!(!result.has_more);
        assert_eq!(result.questions, records);
    }

    #[tokio::test]
    async fn merged_length_is_sum_of_pages_for_any_shape() {
        for total in [0, 1, 9, 10, 11, 37] {
            for page_size in [1, 3, 10, 50] {
                let records = catalog(total);
                let mut fetched = 0;
                let mut returned = 0;

                let result = quick(page_size)
                    .accumulate("grid", |skip, limit| {
                        let page = serve(&records, total, skip, limit);
                        fetched += 1;
                        returned += page.questions.len();
                        ready(Ok(page))
                    })
                    .await
                    .unwrap();

                assert!(result.questions.len() >= total);
                assert_eq!(result.questions.len(), returned);
                assert_eq!(fetched, total.div_ceil(page_size).max(1));
            }
        }
    }

    #[tokio::test]
    async fn overstated_total_hits_page_budget() {
        let records = catalog(12);
        let mut calls = 0;

        let err = quick(10)
            .accumulate("overstated", |skip, limit| {
                calls += 1;
                ready(Ok(serve(&records, 30, skip, limit)))
            })
            .await
            .unwrap_err();

        // ceil(30 / 10) + 2 slack pages
        assert_eq!(calls, 5);
        match err {
            PaginateError::PageBudgetExhausted {
                total,
                fetched_pages,
                ref partial,
            } => {
                assert_eq!(total, 30);
                assert_eq!(fetched_pages, 5);
                assert_eq!(partial.questions.len(), 12);
                assert!(partial.has_more);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn transient_failure_retries_same_offset() {
        let records = catalog(25);
        let mut skips = Vec::new();
        let mut failed_once = false;

        let result = quick(10)
            .accumulate("flaky", |skip, limit| {
                skips.push(skip);
                if skip == 10 && !failed_once {
                    failed_once = true;
                    return ready(Err(ApiError::Timeout));
                }
                ready(Ok(serve(&records, 25, skip, limit)))
            })
            .await
            .unwrap();

        assert_eq!(skips, vec![0, 10, 10, 20]);
        assert_eq!(result.questions, records);
    }

    #[tokio::test]
    async fn persistent_failure_aborts_with_partial() {
        let records = catalog(25);
        let mut calls = 0;

        let err = quick(10)
            .accumulate("broken", |skip, limit| {
                calls += 1;
                if skip == 10 {
                    return ready(Err(ApiError::Status(
                        reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                    )));
                }
                ready(Ok(serve(&records, 25, skip, limit)))
            })
            .await
            .unwrap_err();

        assert_eq!(calls, 1 + 3);
        match &err {
            PaginateError::Page {
                skip,
                attempts,
                source,
                ..
            } => {
                assert_eq!(*skip, 10);
                assert_eq!(*attempts, 3);
                assert!(matches!(source, ApiError::Status(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.partial().questions.len(), 10);
    }

    #[tokio::test]
    async fn first_page_failure_returns_empty_partial() {
        let err = quick(10)
            .with_retries(1, Duration::ZERO)
            .accumulate("down", |_, _| ready(Err(ApiError::Timeout)))
            .await
            .unwrap_err();

        assert!(err.partial().questions.is_empty());
    }

    #[tokio::test]
    async fn accumulates_favorite_list_through_client() {
        let transport = FakeTransport::default();
        let slugs: Vec<String> = (0..25).map(|i| format!("q-{i}")).collect();
        transport.push_json(favorite_page(&slugs[0..10], 25, true));
        transport.push_json(favorite_page(&slugs[10..20], 25, true));
        transport.push_json(favorite_page(&slugs[20..25], 25, false));
        let client = LeetCodeClient::with_transport(&transport);
        let client = &client;

        let result = quick(10)
            .accumulate("facebook-thirty-days", move |skip, limit| async move {
                client
                    .fetch_favorite_page("facebook-thirty-days", skip, limit)
                    .await
                    .map(Page::from)
            })
            .await
            .unwrap();

        assert_eq!(transport.skips(), vec![0, 10, 20]);
        let got: Vec<_> = result.questions.iter().map(|q| q.title_slug.clone()).collect();
        assert_eq!(got, slugs);
    }
}
