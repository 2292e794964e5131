use serde::{Deserialize, Serialize};

/// A paper as returned by the search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub link: String,
    pub published: String,
}

impl Article {
    /// Provider id of the record behind `link`.
    ///
    /// arXiv links look like `http://arxiv.org/abs/2301.07041v1`; old-style ids
    /// carry their archive prefix (`http://arxiv.org/abs/hep-th/9901001v1`), so
    /// everything after `/abs/` is kept when present. Other links fall back to
    /// the trailing path segment.
    pub fn source_id(&self) -> Option<&str> {
        let link = self.link.trim().trim_end_matches('/');
        let id = match link.find("/abs/") {
            Some(i) => &link[i + "/abs/".len()..],
            None => link.rsplit('/').next().unwrap_or_default(),
        };
        (!id.is_empty()).then_some(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedArticle {
    #[serde(flatten)]
    pub article: Article,
    pub score: f64,
    pub reasoning: String,
}

impl RankedArticle {
    pub fn new(article: Article, score: f64, reasoning: impl Into<String>) -> Self {
        Self {
            article,
            score,
            reasoning: reasoning.into(),
        }
    }

    pub fn unscored(article: Article, reasoning: impl Into<String>) -> Self {
        Self::new(article, 0.0, reasoning)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub articles: Vec<RankedArticle>,
    pub llm_reasoning: String,
}

/// Outcome of archiving a batch of articles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveReport {
    pub message: String,
    pub saved_files: Vec<String>,
    #[serde(default)]
    pub failures: Vec<SaveFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFailure {
    pub title: String,
    pub link: String,
    pub error: String,
}
