use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Map a display title to a URL-safe filename stem.
///
/// Lowercases, strips diacritics, drops anything outside `[a-z0-9]`,
/// whitespace and `-`, then joins words with single hyphens. The result is
/// either empty or matches `^[a-z0-9]+(-[a-z0-9]+)*$`.
pub fn normalize(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_strips_diacritics() {
        assert_eq!(normalize("Café Élysée"), "cafe-elysee");
        assert_eq!(normalize("Ça déménage à Montréal"), "ca-demenage-a-montreal");
    }

    #[test]
    fn test_simple_title() {
        assert_eq!(normalize("Budget 2024"), "budget-2024");
    }

    #[test]
    fn test_removes_punctuation_and_collapses_separators() {
        assert_eq!(normalize("  Hello,   World!  "), "hello-world");
        assert_eq!(normalize("COVID-19 -- update"), "covid-19-update");
        assert_eq!(normalize("Q&A: tips\tand\ntricks"), "qa-tips-and-tricks");
    }

    #[test]
    fn test_trims_edge_hyphens() {
        assert_eq!(normalize("- Draft -"), "draft");
        assert_eq!(normalize("--"), "");
    }

    #[test]
    fn test_empty_and_symbol_only_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("!!! ???"), "");
    }

    #[test]
    fn test_output_shape_for_assorted_titles() {
        let shape = Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap();
        let titles = [
            "Budget 2024",
            "L'été à Québec",
            " -Leading and trailing- ",
            "Multiple    spaces",
            "emoji 🚀 launch",
            "Straße über Ärger",
            "___",
        ];

        for title in titles {
            let slug = normalize(title);
            assert!(
                slug.is_empty() || shape.is_match(&slug),
                "slug {:?} for {:?} has the wrong shape",
                slug,
                title
            );
        }
    }
}
