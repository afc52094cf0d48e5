/// Lowercased whitespace-separated query terms. Duplicates are kept and each
/// occurrence contributes to the score.
pub fn query_terms(query: &str) -> Vec<String> {
	query.split_whitespace().map(str::to_lowercase).collect()
}

/// Number of words in `text` that contain `term` as a substring. `text` and
/// `term` are expected to be lowercased already.
///
/// Containment, not token equality: "art" matches "smart" and "party".
pub fn containing_words(words: &[&str], term: &str) -> usize {
	words.iter().filter(|w| w.contains(term)).count()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn terms_are_lowercased_and_split_on_any_whitespace() {
		assert_eq!(query_terms("  Calm\tModern  SaaS\n"), vec!["calm", "modern", "saas"]);
		assert!(query_terms("   ").is_empty());
	}

	#[test]
	fn containment_over_matches_short_terms() {
		let words = ["smart", "party", "art", "blue"];
		assert_eq!(containing_words(&words, "art"), 3);
		assert_eq!(containing_words(&words, "blue"), 1);
	}
}
