use px_core::{Article, CompletionModel, RankedArticle, SearchResponse};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub mod parse;
pub mod prompt;

pub use parse::{parse_completion, MalformedResponse, RankingCompletion};

pub const NO_PROFILE_REASONING: &str = "No profile provided";
pub const NO_PROFILE_SUMMARY: &str = "No profile was provided for ranking.";
pub const RANKING_FAILED_REASONING: &str = "Ranking failed";
pub const NO_EXPLANATION: &str = "No explanation provided";

/// Why a ranking attempt fell back to the unscored listing.
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    #[error(transparent)]
    Model(#[from] px_core::Error),

    #[error("malformed ranking response: {0}")]
    Malformed(#[from] MalformedResponse),
}

/// Reorders search results by their relevance to a free-text research profile.
pub struct ProfileReranker {
    model: Arc<dyn CompletionModel>,
}

impl fmt::Debug for ProfileReranker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileReranker")
            .field("model", &self.model.name())
            .finish()
    }
}

impl ProfileReranker {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Rank `articles` against `profile`, keeping at most `display_count`.
    ///
    /// Never fails: a missing profile returns the leading articles unscored,
    /// and a model or parse failure returns them marked as "Ranking failed".
    pub async fn rerank(
        &self,
        articles: &[Article],
        profile: Option<&str>,
        display_count: usize,
    ) -> SearchResponse {
        let Some(profile) = profile.filter(|p| !p.is_empty()) else {
            return unranked(articles, display_count, NO_PROFILE_REASONING, NO_PROFILE_SUMMARY.to_string());
        };

        match self.rank(articles, profile, display_count).await {
            Ok(response) => response,
            Err(e) => {
                warn!("⚠️ Ranking with {} failed: {}", self.model.name(), e);
                unranked(
                    articles,
                    display_count,
                    RANKING_FAILED_REASONING,
                    format!("Error during ranking: {}", e),
                )
            }
        }
    }

    async fn rank(
        &self,
        articles: &[Article],
        profile: &str,
        display_count: usize,
    ) -> Result<SearchResponse, RankingError> {
        let request = prompt::build_request(articles, profile);
        debug!("Ranking prompt:\n{}", request.prompt);

        info!("🧠 Ranking {} articles with {}", articles.len(), self.model.name());
        let completion = self.model.complete(&request).await?;
        debug!("Ranking completion:\n{}", completion);

        let parsed = parse_completion(&completion)?;
        Ok(merge(articles, parsed, display_count))
    }
}

/// Attach parsed scores to their articles, best first.
pub fn merge(articles: &[Article], parsed: RankingCompletion, display_count: usize) -> SearchResponse {
    let RankingCompletion {
        rankings,
        mut explanations,
        summary,
    } = parsed;

    let mut ranked: Vec<RankedArticle> = rankings
        .into_iter()
        .filter_map(|(number, score)| {
            let index = usize::try_from(number).ok()?.checked_sub(1)?;
            let article = articles.get(index)?;
            let reasoning = explanations
                .remove(&number)
                .unwrap_or_else(|| NO_EXPLANATION.to_string());
            Some(RankedArticle::new(article.clone(), score, reasoning))
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(display_count);

    SearchResponse {
        articles: ranked,
        llm_reasoning: summary,
    }
}

fn unranked(articles: &[Article], display_count: usize, reasoning: &str, summary: String) -> SearchResponse {
    SearchResponse {
        articles: articles
            .iter()
            .take(display_count)
            .cloned()
            .map(|article| RankedArticle::unscored(article, reasoning))
            .collect(),
        llm_reasoning: summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dummy::DummyModel;
    use async_trait::async_trait;
    use px_core::{CompletionRequest, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn articles(titles: &[&str]) -> Vec<Article> {
        titles
            .iter()
            .enumerate()
            .map(|(i, title)| Article {
                title: title.to_string(),
                description: format!("Summary of {}", title),
                link: format!("http://arxiv.org/abs/2401.0000{}v1", i),
                published: "2024-01-01T00:00:00+00:00".to_string(),
            })
            .collect()
    }

    fn reranker(completion: &str) -> ProfileReranker {
        ProfileReranker::new(Arc::new(DummyModel::with_response(completion)))
    }

    #[derive(Debug, Default)]
    struct CountingModel {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionModel for CountingModel {
        fn name(&self) -> &str {
            "Counting"
        }

        async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(px_core::Error::Inference("service unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_no_profile_returns_front_unscored() {
        let input = articles(&["A", "B", "C"]);
        let model = Arc::new(CountingModel::default());
        let reranker = ProfileReranker::new(model.clone());

        for profile in [None, Some("")] {
            let response = reranker.rerank(&input, profile, 2).await;
            assert_eq!(response.articles.len(), 2);
            assert_eq!(response.articles[0].article.title, "A");
            assert_eq!(response.articles[1].article.title, "B");
            assert!(response.articles.iter().all(|a| a.score == 0.0));
            assert!(response.articles.iter().all(|a| a.reasoning == NO_PROFILE_REASONING));
            assert_eq!(response.llm_reasoning, NO_PROFILE_SUMMARY);
        }
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_profile_display_count_exceeds_input() {
        let input = articles(&["A", "B"]);
        let response = reranker("").rerank(&input, None, 10).await;
        assert_eq!(response.articles.len(), 2);
    }

    #[tokio::test]
    async fn test_reference_completion() {
        let input = articles(&["A", "B"]);
        let completion = "RANKINGS:\n1: 2, 90\n\nEXPLANATIONS:\n2: matches well\n\nSUMMARY:\nGood match";
        let response = reranker(completion).rerank(&input, Some("graph theory"), 10).await;

        assert_eq!(
            response.articles,
            vec![RankedArticle::new(input[1].clone(), 90.0, "matches well")]
        );
        assert_eq!(response.llm_reasoning, "Good match");
    }

    #[tokio::test]
    async fn test_sorted_descending_and_truncated() {
        let input = articles(&["A", "B", "C", "D"]);
        let completion = "RANKINGS:\n1: 1, 20\n2: 4, 80\n3: 3, 55\n4: 2, 99\n\n\
            EXPLANATIONS:\n1: weak\n2: strong\n4: best\n\nSUMMARY:\nDone";
        let response = reranker(completion).rerank(&input, Some("profile"), 3).await;

        let titles: Vec<_> = response.articles.iter().map(|a| a.article.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "D", "C"]);
        let scores: Vec<_> = response.articles.iter().map(|a| a.score).collect();
        assert_eq!(scores, vec![99.0, 80.0, 55.0]);
        assert_eq!(response.articles[2].reasoning, NO_EXPLANATION);
    }

    #[tokio::test]
    async fn test_ties_keep_ranking_order() {
        let input = articles(&["A", "B", "C"]);
        let completion = "RANKINGS:\n1: 3, 50\n2: 1, 50\n3: 2, 50\n\nEXPLANATIONS:\n\nSUMMARY:\ntie";
        let response = reranker(completion).rerank(&input, Some("profile"), 3).await;
        let titles: Vec<_> = response.articles.iter().map(|a| a.article.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
    }

    #[tokio::test]
    async fn test_out_of_range_numbers_dropped() {
        let input = articles(&["A", "B"]);
        let completion = "RANKINGS:\n1: 7, 99\n2: 0, 98\n3: -1, 97\n4: 1, 40\n\n\
            EXPLANATIONS:\n7: ghost\n\nSUMMARY:\nPartial";
        let response = reranker(completion).rerank(&input, Some("profile"), 10).await;

        assert_eq!(response.articles.len(), 1);
        assert_eq!(response.articles[0].article.title, "A");
        assert_eq!(response.articles[0].score, 40.0);
        assert_eq!(response.llm_reasoning, "Partial");
    }

    #[tokio::test]
    async fn test_overflowing_number_dropped_without_error() {
        let input = articles(&["A", "B"]);
        let completion = "RANKINGS:\n1: 99999999999999999999, 5\n2: 1, 70\n\nEXPLANATIONS:\n\nSUMMARY:\nok";
        let response = reranker(completion).rerank(&input, Some("profile"), 10).await;

        assert_eq!(
            response.articles,
            vec![RankedArticle::new(input[0].clone(), 70.0, NO_EXPLANATION)]
        );
        assert_eq!(response.llm_reasoning, "ok");
    }

    #[tokio::test]
    async fn test_missing_section_falls_back() {
        let input = articles(&["A", "B", "C"]);
        let completion = "RANKINGS:\n1: 2, 90\n\nSUMMARY:\nNo explanations here";
        let response = reranker(completion).rerank(&input, Some("profile"), 2).await;

        assert_eq!(response.articles.len(), 2);
        assert_eq!(response.articles[0].article.title, "A");
        assert!(response.articles.iter().all(|a| a.score == 0.0));
        assert!(response.articles.iter().all(|a| a.reasoning == RANKING_FAILED_REASONING));
        assert!(response.llm_reasoning.starts_with("Error during ranking: "));
        assert!(response.llm_reasoning.contains("missing EXPLANATIONS: section"));
    }

    #[tokio::test]
    async fn test_malformed_line_falls_back_without_partial_result() {
        let input = articles(&["A", "B"]);
        let completion = "RANKINGS:\n1: 2, 90\n2: 1, lots\n\nEXPLANATIONS:\n\nSUMMARY:\nx";
        let response = reranker(completion).rerank(&input, Some("profile"), 5).await;

        assert_eq!(response.articles.len(), 2);
        assert!(response.articles.iter().all(|a| a.reasoning == RANKING_FAILED_REASONING));
    }

    #[tokio::test]
    async fn test_model_error_falls_back() {
        let input = articles(&["A", "B", "C"]);
        let model = Arc::new(CountingModel::default());
        let response = ProfileReranker::new(model.clone())
            .rerank(&input, Some("profile"), 2)
            .await;

        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        assert_eq!(response.articles.len(), 2);
        assert_eq!(
            response.llm_reasoning,
            "Error during ranking: Inference error: service unavailable"
        );
    }
}
