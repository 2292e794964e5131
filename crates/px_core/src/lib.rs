pub mod error;
pub mod models;
pub mod source;
pub mod types;

pub use error::{Error, Result};
pub use models::{CompletionModel, CompletionRequest};
pub use source::PaperSource;
pub use types::{Article, RankedArticle, SaveFailure, SaveReport, SearchResponse};
