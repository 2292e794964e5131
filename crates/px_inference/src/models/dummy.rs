use std::fmt;
use px_core::{CompletionModel, CompletionRequest, Result};

/// Offline model that answers every prompt with a canned completion.
///
/// Without a scripted response it ranks the listed articles in prompt order,
/// which keeps the service usable without network access.
pub struct DummyModel {
    response: Option<String>,
}

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel")
            .field("scripted", &self.response.is_some())
            .finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self { response: None }
    }

    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
        }
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

fn listing_order_completion(prompt: &str) -> String {
    let count = prompt
        .lines()
        .filter(|line| {
            line.strip_prefix("Article ")
                .and_then(|rest| rest.strip_suffix(':'))
                .map_or(false, |n| n.parse::<usize>().is_ok())
        })
        .count();

    let rankings = (1..=count).map(|n| format!("{}: {}, {}", n, n, 100usize.saturating_sub(n - 1)));
    let explanations = (1..=count).map(|n| format!("{}: Listed at position {}.", n, n));

    [
        section("RANKINGS:", rankings),
        section("EXPLANATIONS:", explanations),
        section("SUMMARY:", std::iter::once("Articles kept in search order.".to_string())),
    ]
    .join("\n\n")
}

fn section(header: &str, lines: impl Iterator<Item = String>) -> String {
    std::iter::once(header.to_string())
        .chain(lines)
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait::async_trait]
impl CompletionModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        Ok(match &self.response {
            Some(response) => response.clone(),
            None => listing_order_completion(&request.prompt),
        })
    }
}
