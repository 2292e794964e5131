pub const MAX_FILENAME_CHARS: usize = 100;

const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Turn an arbitrary title into a file-system safe name of at most
/// `MAX_FILENAME_CHARS` characters.
pub fn normalize(title: &str) -> String {
    title
        .chars()
        .filter(|c| !FORBIDDEN.contains(c))
        .map(|c| if c == ' ' { '_' } else { c })
        .take(MAX_FILENAME_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_and_replaces() {
        assert_eq!(
            normalize("What is <Attention>? A \"survey\": part 1/2 | v*"),
            "What_is_Attention_A_survey_part_12__v"
        );
        assert_eq!(normalize(r"C:\papers\draft"), "Cpapersdraft");
    }

    #[test]
    fn test_normalize_truncates_by_chars() {
        let long = "é".repeat(150);
        let name = normalize(&long);
        assert_eq!(name.chars().count(), MAX_FILENAME_CHARS);

        assert_eq!(normalize(&"ab ".repeat(50)).len(), MAX_FILENAME_CHARS);
    }

    #[test]
    fn test_normalize_invariants_hold() {
        let titles = [
            "",
            " ",
            "???",
            "A Plain Title",
            "Tabs\tand\nnewlines stay",
            "<<<>>>:::\"\"\"///\\\\\\|||???***",
            "Deep Learning: A Survey of *Everything* You Need / Want to Know About Neural Networks, Transformers, and Beyond",
            "量子 コンピュータ: 入門",
        ];
        for title in titles {
            let name = normalize(title);
            assert!(name.chars().count() <= MAX_FILENAME_CHARS, "{title:?}");
            assert!(!name.contains(' '), "{title:?}");
            assert!(!name.chars().any(|c| FORBIDDEN.contains(&c)), "{title:?}");
            assert_eq!(name, normalize(title));
        }
    }

    #[test]
    fn test_normalize_empty_when_only_forbidden() {
        assert_eq!(normalize("<>:\"/\\|?*"), "");
    }
}
