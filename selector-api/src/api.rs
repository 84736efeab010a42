use anyhow::Context;
use log::{debug, error, info, trace, warn};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::sleep;
use urlencoding::encode;

use crate::models::config::Config;

const CONNECT_TIMEOUT_SECS: u64 = 10;

pub fn build_url(base: &str, path: &str, params: &[(&str, String)]) -> String {
    let base = base.trim_end_matches('/');
    let url = if params.is_empty() {
        format!("{base}{path}")
    } else {
        let qs = params
            .iter()
            .map(|(k, v)| format!("{k}={}", encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{base}{path}?{qs}")
    };
    trace!("build_url: path={path} -> {url}");
    url
}

/// Search URL for one 1-based result page of `tag`.
pub fn search_url(cfg: &Config, tag: &str, page: usize) -> String {
    build_url(
        &cfg.base_url,
        &cfg.search_path,
        &[("page", page.to_string()), ("tags", tag.to_string())],
    )
}

pub fn build_client(cfg: &Config) -> anyhow::Result<Client> {
    info!("Building HTTP client");
    reqwest::Client::builder()
        .user_agent(cfg.user_agent.as_str())
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(cfg.request_timeout()))
        .timeout(cfg.request_timeout())
        .build()
        .context("building HTTP client")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Body(String),
    /// Every attempt failed; callers treat this as "no data for this page".
    Exhausted { attempts: usize, last_error: String },
}

impl FetchOutcome {
    pub fn into_body(self) -> Option<String> {
        match self {
            FetchOutcome::Body(b) => Some(b),
            FetchOutcome::Exhausted { .. } => None,
        }
    }
}

/// Rate-limited, retrying GET client shared by all page jobs of one scrape session.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    limiter: Arc<Semaphore>,
    cfg: Arc<Config>,
}

impl Fetcher {
    pub fn new(cfg: Arc<Config>) -> anyhow::Result<Self> {
        let client = build_client(&cfg)?;
        let limiter = Arc::new(Semaphore::new(cfg.max_concurrency.max(1)));
        Ok(Self {
            client,
            limiter,
            cfg,
        })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let attempts = self.cfg.max_retries.max(1);
        let mut last_error = String::new();

        for attempt in 0..attempts {
            let result = {
                let _permit = match self.limiter.acquire().await {
                    Ok(p) => p,
                    Err(e) => {
                        error!("Request limiter closed: {e}");
                        return FetchOutcome::Exhausted {
                            attempts: attempt,
                            last_error: format!("limiter closed: {e}"),
                        };
                    }
                };
                sleep(self.cfg.rps_delay()).await;
                debug!(
                    "HTTP attempt {}/{}: GET {} (rps_delay={}ms)",
                    attempt + 1,
                    attempts,
                    url,
                    self.cfg.rps_delay_ms
                );
                self.try_once(url).await
            };

            match result {
                Ok(body) => {
                    trace!("GET {url} returned {} bytes", body.len());
                    return FetchOutcome::Body(body);
                }
                Err(e) => {
                    if attempt + 1 < attempts {
                        let delay = self.cfg.backoff(attempt);
                        warn!(
                            "Request error on attempt {}/{}: {}. Retrying in {:?}",
                            attempt + 1,
                            attempts,
                            e,
                            delay
                        );
                        sleep(delay).await;
                    }
                    last_error = e;
                }
            }
        }

        error!("GET {url} failed after {attempts} attempts: {last_error}");
        FetchOutcome::Exhausted {
            attempts,
            last_error,
        }
    }

    async fn try_once(&self, url: &str) -> Result<String, String> {
        let resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                format!("timed out: {e}")
            } else {
                format!("request failed: {e}")
            }
        })?;

        let status = resp.status();
        trace!("HTTP status received: {status}");
        if !status.is_success() {
            return Err(format!("non-success status {status}"));
        }

        resp.text().await.map_err(|e| format!("body read failed: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> Arc<Config> {
        Arc::new(Config {
            base_url,
            rps_delay_ms: 0,
            backoff_base_ms: 1,
            request_timeout_secs: 2,
            ..Config::default()
        })
    }

    #[test]
    fn search_url_encodes_tag() {
        let cfg = Config {
            base_url: "https://board.example/".to_string(),
            ..Config::default()
        };
        assert_eq!(
            search_url(&cfg, "kaito_(vocaloid)", 2),
            "https://board.example/posts?page=2&tags=kaito_%28vocaloid%29"
        );
    }

    #[tokio::test]
    async fn fetch_returns_body_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .and(query_param("tags", "hatsune_miku"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(1)
            .mount(&server)
            .await;

        let cfg = test_config(server.uri());
        let fetcher = Fetcher::new(cfg.clone()).unwrap();
        let outcome = fetcher.fetch(&search_url(&cfg, "hatsune_miku", 1)).await;
        assert_eq!(outcome, FetchOutcome::Body("<html></html>".to_string()));
    }

    #[tokio::test]
    async fn fetch_recovers_on_third_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .with_priority(1)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_string("third time"))
            .expect(1)
            .mount(&server)
            .await;

        let cfg = test_config(server.uri());
        let fetcher = Fetcher::new(cfg.clone()).unwrap();
        let outcome = fetcher.fetch(&search_url(&cfg, "x", 1)).await;
        assert_eq!(outcome.into_body().as_deref(), Some("third time"));
    }

    #[tokio::test]
    async fn fetch_gives_up_after_retry_budget() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let cfg = test_config(server.uri());
        let fetcher = Fetcher::new(cfg.clone()).unwrap();
        match fetcher.fetch(&search_url(&cfg, "x", 1)).await {
            FetchOutcome::Exhausted {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("500"), "{last_error}");
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_response_counts_as_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_millis(1500)),
            )
            .mount(&server)
            .await;

        let cfg = Arc::new(Config {
            base_url: server.uri(),
            rps_delay_ms: 0,
            backoff_base_ms: 1,
            max_retries: 1,
            request_timeout_secs: 1,
            ..Config::default()
        });
        let fetcher = Fetcher::new(cfg.clone()).unwrap();
        let outcome = fetcher.fetch(&search_url(&cfg, "x", 1)).await;
        assert!(matches!(outcome, FetchOutcome::Exhausted { attempts: 1, .. }));
    }

    #[tokio::test]
    async fn rate_delay_precedes_every_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let cfg = Arc::new(Config {
            rps_delay_ms: 200,
            ..(*test_config(server.uri())).clone()
        });
        let fetcher = Fetcher::new(cfg.clone()).unwrap();
        let started = Instant::now();
        let outcome = fetcher.fetch(&search_url(&cfg, "x", 1)).await;
        assert_eq!(outcome, FetchOutcome::Body("ok".to_string()));
        assert!(started.elapsed() >= Duration::from_millis(200));

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;
        let cfg = Arc::new(Config {
            rps_delay_ms: 100,
            max_retries: 3,
            ..(*test_config(server.uri())).clone()
        });
        let fetcher = Fetcher::new(cfg.clone()).unwrap();
        let started = Instant::now();
        let outcome = fetcher.fetch(&search_url(&cfg, "x", 1)).await;
        assert!(matches!(outcome, FetchOutcome::Exhausted { attempts: 3, .. }));
        assert!(started.elapsed() >= Duration::from_millis(300));
    }
}
