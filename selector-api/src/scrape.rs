use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::api::{search_url, FetchOutcome, Fetcher};
use crate::extract::{extract_post_tags, ExtractRules};
use crate::models::config::Config;
use crate::models::PageOutcome;

/// One HTTP client and one request limiter, alive for a single character's scrape.
pub struct ScrapeSession {
    fetcher: Fetcher,
    rules: Arc<ExtractRules>,
}

impl ScrapeSession {
    pub fn open(cfg: Arc<Config>) -> anyhow::Result<Self> {
        let rules = Arc::new(ExtractRules::from_config(&cfg));
        let fetcher = Fetcher::new(cfg)?;
        Ok(Self { fetcher, rules })
    }

    /// Fetches pages `1..=pages` concurrently. The result is indexed by page.
    pub async fn scrape_pages(&self, tag: &str, pages: usize) -> Vec<PageOutcome> {
        let mut jobs = JoinSet::new();
        for page in 1..=pages {
            let fetcher = self.fetcher.clone();
            let rules = self.rules.clone();
            let url = search_url(fetcher.config(), tag, page);
            jobs.spawn(async move { (page, scrape_page(&fetcher, &rules, &url).await) });
        }

        let mut outcomes = vec![PageOutcome::Failed("page job did not finish".to_string()); pages];
        while let Some(joined) = jobs.join_next().await {
            match joined {
                Ok((page, outcome)) => outcomes[page - 1] = outcome,
                Err(e) => error!("page job for '{tag}' aborted: {e}"),
            }
        }
        outcomes
    }

    /// Raw per-post tag strings for `tag`, concatenated in page order.
    pub async fn scrape(&self, tag: &str, pages: usize) -> Vec<String> {
        let outcomes = self.scrape_pages(tag, pages).await;
        let failed = outcomes
            .iter()
            .filter(|o| matches!(o, PageOutcome::Failed(_)))
            .count();
        let posts: Vec<String> = outcomes
            .into_iter()
            .flat_map(PageOutcome::into_posts)
            .collect();

        if posts.is_empty() {
            warn!("no posts found for '{tag}' across {pages} page(s)");
        } else {
            info!(
                "scraped {} posts for '{tag}' ({pages} page(s), {failed} failed)",
                posts.len()
            );
        }
        posts
    }
}

async fn scrape_page(fetcher: &Fetcher, rules: &ExtractRules, url: &str) -> PageOutcome {
    match fetcher.fetch(url).await {
        FetchOutcome::Body(body) => {
            let outcome = PageOutcome::from_posts(extract_post_tags(&body, rules));
            debug!("{url}: {} posts", outcome.post_count());
            outcome
        }
        FetchOutcome::Exhausted {
            attempts,
            last_error,
        } => PageOutcome::Failed(format!("{attempts} attempt(s): {last_error}")),
    }
}

/// Opens a session, scrapes, and tears the session down again.
pub async fn scrape(cfg: Arc<Config>, tag: &str, pages: usize) -> anyhow::Result<Vec<String>> {
    let session = ScrapeSession::open(cfg)?;
    Ok(session.scrape(tag, pages).await)
}
