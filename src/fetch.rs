//! HTTP access to the job board

use crate::config::SearchConfig;
use crate::error::Result;
use crate::listing::{JobPosting, ListingParser, TitleFilter};
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::time::Duration;

/// Where postings and their detail pages come from
pub trait JobSource {
    /// Every matching posting across all result pages
    fn fetch_postings(&self) -> impl Future<Output = Result<Vec<JobPosting>>> + Send;

    /// Raw detail page markup, `None` when the server did not answer with success
    fn fetch_detail(&self, url: &str) -> impl Future<Output = Result<Option<String>>> + Send;
}

pub struct DiceClient {
    client: Client,
    search_url: String,
    parser: ListingParser,
    max_pages: usize,
    max_retries: usize,
}

impl DiceClient {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            search_url: config.url.clone(),
            parser: ListingParser::new(TitleFilter::new(&config.title_keywords)?),
            max_pages: config.max_pages,
            max_retries: config.max_retries.max(1),
        })
    }

    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<Option<String>> {
        let mut attempt = 0usize;
        loop {
            match self.client.get(url).query(query).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(Some(response.text().await?));
                    }
                    if should_retry(status) && attempt + 1 < self.max_retries {
                        attempt += 1;
                        debug!("{} answered {}, retry {} of {}", url, status, attempt, self.max_retries - 1);
                        tokio::time::sleep(retry_backoff(attempt)).await;
                        continue;
                    }
                    warn!("{} answered {}", url, status);
                    return Ok(None);
                }
                Err(err) => {
                    if (err.is_timeout() || err.is_connect()) && attempt + 1 < self.max_retries {
                        attempt += 1;
                        debug!("Request to {} failed ({}), retry {}", url, err, attempt);
                        tokio::time::sleep(retry_backoff(attempt)).await;
                        continue;
                    }
                    return Err(err.into());
                }
            }
        }
    }
}

impl JobSource for DiceClient {
    async fn fetch_postings(&self) -> Result<Vec<JobPosting>> {
        let mut postings = Vec::new();

        for page in 0..self.max_pages {
            let Some(markup) = self.get_text(&self.search_url, &[("page", page.to_string())]).await? else {
                break;
            };

            let page_postings = self.parser.parse(&markup);
            if page_postings.is_empty() {
                debug!("Page {} has no matching postings, stopping", page);
                break;
            }

            info!("Page {}: {} matching postings", page, page_postings.len());
            postings.extend(page_postings);
        }

        Ok(postings)
    }

    async fn fetch_detail(&self, url: &str) -> Result<Option<String>> {
        self.get_text(url, &[]).await
    }
}

fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

pub(crate) fn retry_backoff(attempt: usize) -> Duration {
    let capped = attempt.min(5) as u32;
    Duration::from_millis(500 * (1 << capped))
}
