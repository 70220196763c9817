use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

use crate::api::client::LeetCodeClient;
use crate::api::transport::{HttpTransport, Transport};
use crate::api::types::{FavoriteQuestionList, Question, QuestionDetail};
use crate::config::{Config, ScraperSettings};
use crate::paginate::{DEFAULT_MAX_ATTEMPTS, Page, Paginator};
use crate::picker;
use crate::storage;

pub const DEFAULT_SNAPSHOT: &str = "facebook-three-months.json";
pub const SOLVED_FILE: &str = "solved.txt";

/// Runs the network-backed commands against one client.
pub struct App<T = HttpTransport> {
    settings: ScraperSettings,
    client: LeetCodeClient<T>,
}

impl App<HttpTransport> {
    /// Builds the HTTP client from the configured credential, optionally
    /// falling back to the browser's `csrftoken` cookie.
    pub fn connect(config: &mut Config, browser_cookies: bool) -> Result<Self> {
        let credential = match config.credential() {
            Ok(c) => c,
            Err(e) if browser_cookies => {
                info!("{e}; trying browser cookies");
                config
                    .login_from_browser()
                    .context("Failed to load csrf token from browser")?
            }
            Err(e) => return Err(e.into()),
        };
        let client = LeetCodeClient::new(&credential).context("Failed to create HTTP client")?;
        Ok(Self::with_client(config.scraper.clone(), client))
    }
}

impl<T: Transport> App<T> {
    pub fn with_client(settings: ScraperSettings, client: LeetCodeClient<T>) -> Self {
        Self { settings, client }
    }

    fn throttle(&self) -> Duration {
        Duration::from_millis(self.settings.throttle_ms)
    }

    /// Retries back off in multiples of twice the throttle.
    fn paginator(&self, page_size: Option<usize>) -> Paginator {
        Paginator::new(page_size.unwrap_or(self.settings.page_size))
            .with_throttle(self.throttle())
            .with_retries(DEFAULT_MAX_ATTEMPTS, self.throttle().saturating_mul(2))
    }

    /// Scrapes a whole favorite list and saves it. When a page gives out
    /// midway, whatever was fetched is still written before the error is
    /// returned.
    pub async fn favorites(
        &self,
        favorite_slug: &str,
        page_size: Option<usize>,
        out: Option<PathBuf>,
    ) -> Result<FavoriteQuestionList> {
        let out = out.unwrap_or_else(|| {
            self.settings
                .data_dir
                .join(format!("{favorite_slug}.json"))
        });
        info!("Scraping favorite list {favorite_slug}...");

        let client = &self.client;
        let result = self
            .paginator(page_size)
            .accumulate(favorite_slug, move |skip, limit| async move {
                client
                    .fetch_favorite_page(favorite_slug, skip, limit)
                    .await
                    .map(Page::from)
            })
            .await;

        match result {
            Ok(list) => {
                info!("Found {} problems in favorite list", list.questions.len());
                storage::save_json(&list, &out).context("Failed to save favorite list")?;
                info!("Saved to {}", out.display());
                Ok(list)
            }
            Err(e) => {
                let partial = e.partial();
                warn!(
                    "Saving partial favorite list ({} of {} problems)",
                    partial.questions.len(),
                    partial.total_length
                );
                storage::save_json(partial, &out).context("Failed to save partial favorite list")?;
                Err(e).context(format!("Failed to scrape favorite list {favorite_slug}"))
            }
        }
    }

    /// Fetches one page of the problem list, or all of it with `all`, then
    /// optionally the details of the first `details` problems.
    pub async fn problems(
        &self,
        skip: usize,
        limit: usize,
        all: bool,
        details: usize,
        out: Option<PathBuf>,
    ) -> Result<Vec<Question>> {
        let out = out.unwrap_or_else(|| self.settings.data_dir.join("all_problems_batch_1.json"));

        let problems = if all {
            info!("Scraping the full problem list...");
            let client = &self.client;
            let result = self
                .paginator(Some(limit))
                .accumulate("problemset", move |skip, limit| async move {
                    client.fetch_problem_page(skip, limit).await.map(Page::from)
                })
                .await;
            match result {
                Ok(list) => {
                    storage::save_json(&list, &out).context("Failed to save problem list")?;
                    list.questions
                }
                Err(e) => {
                    let partial = e.partial();
                    warn!(
                        "Saving partial problem list ({} of {} problems)",
                        partial.questions.len(),
                        partial.total_length
                    );
                    storage::save_json(partial, &out)
                        .context("Failed to save partial problem list")?;
                    return Err(e).context("Failed to scrape problem list");
                }
            }
        } else {
            info!("Scraping problems (skip {skip}, limit {limit})...");
            let page = self
                .client
                .fetch_problem_page(skip, limit)
                .await
                .context("Failed to scrape problems")?;
            let batch = FavoriteQuestionList {
                has_more: skip + page.questions.len() < page.total,
                total_length: page.total,
                questions: page.questions,
            };
            storage::save_json(&batch, &out).context("Failed to save problems")?;
            batch.questions
        };
        info!("Found {} problems, saved to {}", problems.len(), out.display());

        if details > 0 {
            self.details(&problems, details).await;
        }
        Ok(problems)
    }

    /// Fetches details for the first `count` problems, skipping paid ones.
    /// A failure on one problem is logged and the rest carry on.
    async fn details(&self, problems: &[Question], count: usize) {
        let dir = self.settings.data_dir.join("problem_details");
        info!("Getting detailed information for first {count} problems...");

        for (i, problem) in problems.iter().take(count).enumerate() {
            if problem.paid_only {
                info!("Skipping paid problem: {}", problem.title);
                continue;
            }

            info!("Getting details for: {}", problem.title);
            match self.client.fetch_question_detail(&problem.title_slug).await {
                Ok(detail) => {
                    let path = dir.join(format!(
                        "{}_{}.json",
                        i + 1,
                        problem.title_slug.replace('-', "_")
                    ));
                    if let Err(e) = storage::save_json(&detail, &path) {
                        error!("Error saving details for {}: {e}", problem.title);
                    }
                }
                Err(e) => error!("Error getting details for {}: {e}", problem.title),
            }

            tokio::time::sleep(self.throttle()).await;
        }
    }

    pub async fn detail(
        &self,
        title_slug: &str,
        print: bool,
        out: Option<PathBuf>,
    ) -> Result<QuestionDetail> {
        let detail = self
            .client
            .fetch_question_detail(title_slug)
            .await
            .with_context(|| format!("Failed to fetch problem {title_slug}"))?;

        let out = out.unwrap_or_else(|| {
            self.settings
                .data_dir
                .join("problem_details")
                .join(format!("{title_slug}.json"))
        });
        storage::save_json(&detail, &out).context("Failed to save problem detail")?;
        info!("Saved {} to {}", detail.title, out.display());

        if print {
            println!("{}", render_detail(&detail));
        }
        Ok(detail)
    }
}

/// Picks a few unsolved problems from a saved snapshot and prints them.
/// Returns `None` when the snapshot could not be read.
pub fn pick(
    settings: &ScraperSettings,
    snapshot: Option<&Path>,
    solved: Option<&Path>,
) -> Option<picker::PickOutcome> {
    let snapshot_path = snapshot
        .map(Path::to_path_buf)
        .unwrap_or_else(|| settings.data_dir.join(DEFAULT_SNAPSHOT));
    let solved_path = solved
        .map(Path::to_path_buf)
        .unwrap_or_else(|| settings.data_dir.join(SOLVED_FILE));

    let list = match storage::load_snapshot(&snapshot_path) {
        Ok(list) => list,
        Err(e) => {
            error!("Error reading snapshot: {e:#}");
            return None;
        }
    };
    let solved = match storage::read_solved(&solved_path) {
        Ok(s) => s,
        Err(e) => {
            error!("Error reading solved slugs: {e:#}");
            return None;
        }
    };

    let outcome = picker::pick(&mut rand::rng(), &list, &solved);
    println!("{outcome}");
    Some(outcome)
}

fn render_detail(detail: &QuestionDetail) -> String {
    let mut text = format!(
        "{}. {} [{:?}]\nhttps://leetcode.com/problems/{}/\n",
        detail.question_frontend_id, detail.title, detail.difficulty, detail.title_slug
    );
    if let Some(ref html) = detail.content {
        text.push('\n');
        text.push_str(&html2text::from_read(html.as_bytes(), 80).unwrap_or_default());
    }
    for (i, hint) in detail.hints.iter().enumerate() {
        text.push_str(&format!("\nHint {}: {}", i + 1, hint));
    }
    text
}
