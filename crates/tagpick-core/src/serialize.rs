/// Splits the host's serialized selection on commas, trimming each token.
/// Empty tokens are dropped and duplicates collapse to their first
/// occurrence, so the result is directly usable as a selection seed.
pub fn split_tags(raw: &str) -> Vec<String> {
    let mut tags = Vec::<String>::new();

    for token in raw.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            continue;
        }
        if tags.iter().any(|existing| existing == trimmed) {
            continue;
        }
        tags.push(trimmed.to_string());
    }

    tags
}

/// Comma-joins a selection in insertion order. Inverse of `split_tags` for
/// already-normalized input.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(",")
}

/// Collapses duplicate entries while preserving first-occurrence order.
/// Used when ingesting a fetched vocabulary, which may contain repeats.
pub fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut result = Vec::<String>::with_capacity(values.len());
    for value in values {
        if !result.contains(&value) {
            result.push(value);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_tags_trims_and_collapses_duplicates() {
        assert_eq!(split_tags("a, b ,a"), vec!["a", "b"]);
    }

    #[test]
    fn split_tags_drops_empty_tokens() {
        assert_eq!(split_tags("a,,b, ,c"), vec!["a", "b", "c"]);
        assert!(split_tags("").is_empty());
        assert!(split_tags(" , ").is_empty());
    }

    #[test]
    fn split_tags_is_case_sensitive() {
        assert_eq!(split_tags("Tag,tag"), vec!["Tag", "tag"]);
    }

    #[test]
    fn join_tags_preserves_insertion_order() {
        let tags = vec!["b".to_string(), "a".to_string()];
        assert_eq!(join_tags(&tags), "b,a");
        assert_eq!(join_tags(&[]), "");
    }

    #[test]
    fn dedup_preserving_order_keeps_first_occurrence() {
        let values = vec![
            "beta".to_string(),
            "alpha".to_string(),
            "beta".to_string(),
        ];
        assert_eq!(dedup_preserving_order(values), vec!["beta", "alpha"]);
    }
}
