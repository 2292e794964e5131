use feed_rs::model::Entry;
use feed_rs::parser;
use px_core::{Article, Error, Result};

use super::utils;

/// One parsed entry of an arXiv Atom response.
#[derive(Debug, Clone, PartialEq)]
pub struct ArxivEntry {
    pub article: Article,
    pub pdf_url: String,
}

/// Parse an arXiv Atom feed body into entries, in feed order.
///
/// arXiv reports query errors as a feed holding a single entry whose id points
/// at `/api/errors`; that entry is turned into `Error::Search`.
pub fn parse_feed(body: &[u8]) -> Result<Vec<ArxivEntry>> {
    let feed = parser::parse(body)
        .map_err(|e| Error::Search(format!("Failed to parse Atom feed: {}", e)))?;

    let mut entries = Vec::with_capacity(feed.entries.len());
    for entry in feed.entries {
        if entry.id.contains("/api/errors") {
            let detail = entry
                .summary
                .as_ref()
                .map(|s| utils::normalize_ws(&s.content))
                .unwrap_or_else(|| entry.id.clone());
            return Err(Error::Search(format!("arXiv rejected the query: {}", detail)));
        }
        entries.push(convert_entry(entry));
    }
    Ok(entries)
}

fn convert_entry(entry: Entry) -> ArxivEntry {
    let title = entry
        .title
        .as_ref()
        .map(|t| utils::normalize_ws(&t.content))
        .unwrap_or_default();
    let description = entry
        .summary
        .as_ref()
        .map(|s| utils::normalize_ws(&s.content))
        .unwrap_or_default();
    let published = entry
        .published
        .or(entry.updated)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default();

    let pdf_url = entry
        .links
        .iter()
        .find(|link| {
            link.title.as_deref() == Some("pdf")
                || link.media_type.as_deref() == Some("application/pdf")
        })
        .map(|link| link.href.clone())
        .unwrap_or_else(|| utils::pdf_url_from_abs(&entry.id));

    ArxivEntry {
        article: Article {
            title,
            description,
            link: entry.id,
            published,
        },
        pdf_url,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use super::fixtures::atom_feed;

    #[test]
    fn test_parse_feed_normalizes_entry() {
        let body = atom_feed(&[(
            "http://arxiv.org/abs/2301.07041v1".to_string(),
            "Attention Is\n    All You Need".to_string(),
            Some("http://arxiv.org/pdf/2301.07041v1".to_string()),
        )]);

        let entries = parse_feed(body.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.article.title, "Attention Is All You Need");
        assert_eq!(entry.article.description, "Summary of Attention Is All You Need.");
        assert_eq!(entry.article.link, "http://arxiv.org/abs/2301.07041v1");
        assert_eq!(entry.article.published, "2023-01-17T18:58:18+00:00");
        assert_eq!(entry.pdf_url, "http://arxiv.org/pdf/2301.07041v1");
    }

    #[test]
    fn test_parse_feed_pdf_url_fallback() {
        let body = atom_feed(&[(
            "http://arxiv.org/abs/hep-th/9901001v1".to_string(),
            "Old Style".to_string(),
            None,
        )]);

        let entries = parse_feed(body.as_bytes()).unwrap();
        assert_eq!(entries[0].pdf_url, "http://arxiv.org/pdf/hep-th/9901001v1");
    }

    #[test]
    fn test_parse_feed_keeps_order() {
        let body = atom_feed(&[
            ("http://arxiv.org/abs/1".to_string(), "First".to_string(), None),
            ("http://arxiv.org/abs/2".to_string(), "Second".to_string(), None),
            ("http://arxiv.org/abs/3".to_string(), "Third".to_string(), None),
        ]);

        let titles: Vec<_> = parse_feed(body.as_bytes())
            .unwrap()
            .into_iter()
            .map(|e| e.article.title)
            .collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_parse_feed_empty() {
        let body = atom_feed(&[]);
        assert!(parse_feed(body.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_feed_api_error() {
        let body = atom_feed(&[(
            "http://arxiv.org/api/errors#incorrect_id_format_for_nope".to_string(),
            "Error".to_string(),
            None,
        )]);

        let err = parse_feed(body.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Search(_)));
        assert!(err.to_string().contains("arXiv rejected the query"));
    }

    #[test]
    fn test_parse_feed_garbage() {
        assert!(matches!(parse_feed(b"not a feed"), Err(Error::Search(_))));
    }
}
