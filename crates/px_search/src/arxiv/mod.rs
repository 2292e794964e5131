use async_trait::async_trait;
use px_core::{Article, Error, PaperSource, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::fmt;
use tracing::{debug, info};
use url::Url;

pub mod feed;

pub use feed::{parse_feed, ArxivEntry};

pub const DEFAULT_ENDPOINT: &str = "http://export.arxiv.org/api/query";
pub const DEFAULT_PAGE_SIZE: usize = 100;
const USER_AGENT: &str = concat!("px/", env!("CARGO_PKG_VERSION"), " (arXiv search service)");

#[derive(Debug, Clone)]
pub struct ArxivConfig {
    pub endpoint: String,
    pub page_size: usize,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ArxivConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

/// Client for the arXiv Atom query API.
pub struct ArxivClient {
    client: Client,
    endpoint: Url,
    page_size: usize,
}

impl fmt::Debug for ArxivClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArxivClient")
            .field("client", &"<reqwest::Client>")
            .field("endpoint", &self.endpoint.as_str())
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl ArxivClient {
    pub fn new(config: ArxivConfig) -> Result<Self> {
        let endpoint = utils::parse_url(&config.endpoint)?;
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            endpoint,
            page_size: config.page_size.max(1),
        })
    }

    fn search_url(&self, query: &str, start: usize, max_results: usize) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("search_query", query)
            .append_pair("start", &start.to_string())
            .append_pair("max_results", &max_results.to_string())
            .append_pair("sortBy", "relevance")
            .append_pair("sortOrder", "descending");
        url
    }

    fn id_url(&self, id: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("id_list", id)
            .append_pair("max_results", "1");
        url
    }

    async fn fetch_feed(&self, url: Url) -> Result<Vec<ArxivEntry>> {
        debug!("Querying arXiv via: {}", url);
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        parse_feed(&body)
    }

    /// Look up a single record by its arXiv id.
    pub async fn fetch_entry(&self, id: &str) -> Result<ArxivEntry> {
        self.fetch_feed(self.id_url(id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("No paper found for id {}", id)))
    }
}

#[async_trait]
impl PaperSource for ArxivClient {
    fn name(&self) -> &str {
        "arXiv"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Article>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidQuery("query must not be empty".to_string()));
        }

        let mut articles = Vec::with_capacity(max_results.min(self.page_size));
        let mut start = 0;
        while articles.len() < max_results {
            let wanted = (max_results - articles.len()).min(self.page_size);
            let entries = self.fetch_feed(self.search_url(query, start, wanted)).await?;
            let fetched = entries.len();
            if fetched == 0 {
                break;
            }

            for entry in entries {
                articles.push(entry.article);
                if articles.len() >= max_results {
                    break;
                }
            }

            if fetched < wanted {
                break;
            }
            start += fetched;
        }

        info!("🔎 arXiv returned {} articles for '{}'", articles.len(), query);
        Ok(articles)
    }

    async fn fetch_document(&self, id: &str) -> Result<Vec<u8>> {
        let entry = self.fetch_entry(id).await?;
        debug!("Downloading {} from {}", id, entry.pdf_url);

        let response = self
            .client
            .get(&entry.pdf_url)
            .send()
            .await?
            .error_for_status()?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok().map(str::to_owned));
        let bytes = response.bytes().await?;

        if utils::is_html_response(content_type.as_deref(), &bytes) {
            return Err(Error::Search(format!(
                "Got HTML instead of PDF for {} (content-type={:?})",
                entry.pdf_url, content_type
            )));
        }
        Ok(bytes.to_vec())
    }
}

/// Common utilities for the arXiv client
pub(crate) mod utils {
    use super::*;

    pub fn parse_url(url: &str) -> Result<Url> {
        Url::parse(url.trim()).map_err(|e| Error::Search(format!("Invalid arXiv endpoint {}: {}", url, e)))
    }

    /// Collapse whitespace runs; arXiv wraps titles and abstracts across lines.
    pub fn normalize_ws(s: &str) -> String {
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    pub fn pdf_url_from_abs(abs_url: &str) -> String {
        abs_url.replacen("/abs/", "/pdf/", 1)
    }

    pub fn is_html_response(content_type: Option<&str>, body: &[u8]) -> bool {
        content_type
            .map(|value| value.to_lowercase().contains("text/html"))
            .unwrap_or(false)
            || body
                .iter()
                .skip_while(|byte| byte.is_ascii_whitespace())
                .take(5)
                .map(|byte| byte.to_ascii_lowercase())
                .eq(b"<html".iter().copied())
    }
}
