use px_core::{Article, CompletionRequest};

pub const SYSTEM_PROMPT: &str = "You are a research paper recommendation system. Your task is to analyze articles and match them with a user's research profile. Provide detailed reasoning for your selections.";

/// Low temperature keeps the ranking format stable between calls.
pub const TEMPERATURE: f32 = 0.3;

const RESPONSE_FORMAT: &str = "For each article, provide:
1. A relevance score (0-100)
2. A brief explanation of why this article matches or doesn't match the profile

Format your response as follows:
RANKINGS:
1: [article number], [score]
2: [article number], [score]
(etc.)

EXPLANATIONS:
[article number]: [explanation]
[article number]: [explanation]
(etc.)

SUMMARY:
[Brief overall explanation of your ranking decisions]";

pub fn build_request(articles: &[Article], profile: &str) -> CompletionRequest {
    CompletionRequest {
        system: SYSTEM_PROMPT.to_string(),
        prompt: build_prompt(articles, profile),
        temperature: TEMPERATURE,
    }
}

pub fn build_prompt(articles: &[Article], profile: &str) -> String {
    let listing = articles
        .iter()
        .enumerate()
        .map(|(i, article)| {
            format!(
                "Article {}:\nTitle: {}\nSummary: {}",
                i + 1,
                article.title,
                article.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Given the following user profile and list of articles, analyze and rank the articles based on their relevance to the user's research profile, expertise, and interests.\n\n\
         User Profile:\n{}\n\n\
         Articles:\n{}\n\n\
         {}",
        profile, listing, RESPONSE_FORMAT
    )
}
