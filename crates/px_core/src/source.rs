use async_trait::async_trait;
use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait PaperSource: Send + Sync {
    fn name(&self) -> &str;

    /// Search the provider, returning at most `max_results` articles in provider order
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Article>>;

    /// Fetch the full document (PDF bytes) of a single record
    async fn fetch_document(&self, id: &str) -> Result<Vec<u8>>;
}
