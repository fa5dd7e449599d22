//! Word frequency counting for word clouds.

use std::collections::HashMap;

/// Common English words dropped before counting.
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "been", "but", "by", "can", "de", "did", "do", "for", "from", "had", "has", "have", "he",
    "her", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "me", "my", "no",
    "not", "of", "on", "or", "our", "she", "so", "than", "that", "the", "their", "them",
    "then", "there", "these", "they", "this", "to", "too", "up", "us", "van", "was", "we",
    "were", "what", "when", "where", "which", "who", "with", "you", "your",
];

/// A word and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Split text into word tokens: runs of alphanumerics and apostrophes.
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| t.chars().count() >= 2)
}

/// Count words case-insensitively, reporting each in its most frequent casing.
/// Sorted by count descending, then word; truncated to `max_words`.
pub fn word_frequencies<S: AsRef<str>>(texts: &[S], max_words: usize) -> Vec<WordCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut casings: HashMap<String, HashMap<String, usize>> = HashMap::new();

    for text in texts {
        for token in tokenize(text.as_ref()) {
            let key = token.to_lowercase();
            if STOPWORDS.contains(&key.as_str()) {
                continue;
            }
            *counts.entry(key.clone()).or_default() += 1;
            *casings
                .entry(key)
                .or_default()
                .entry(token.to_string())
                .or_default() += 1;
        }
    }

    let mut words: Vec<WordCount> = counts
        .into_iter()
        .map(|(key, count)| {
            let word = casings
                .get(&key)
                .and_then(|forms| {
                    forms
                        .iter()
                        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
                        .map(|(form, _)| form.clone())
                })
                .unwrap_or(key);
            WordCount { word, count }
        })
        .collect();

    words.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    words.truncate(max_words);
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_titles_across_names() {
        let names = [
            "Braund, Mr. Owen Harris",
            "Cumings, Mrs. John Bradley (Florence Briggs Thayer)",
            "Heikkinen, Miss. Laina",
            "Allen, Mr. William Henry",
            "Moran, Mr. James",
        ];
        let words = word_frequencies(&names, 200);

        assert_eq!(words[0], WordCount { word: "Mr".to_string(), count: 3 });
        assert!(words.iter().any(|w| w.word == "Mrs" && w.count == 1));
        assert!(words.iter().all(|w| w.count <= 3));
    }

    #[test]
    fn stopwords_and_single_letters_are_dropped() {
        let words = word_frequencies(&["the A of van Der Berg x"], 10);
        let found: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(found, vec!["Berg", "Der"]);
    }

    #[test]
    fn majority_casing_wins_and_limit_applies() {
        let words = word_frequencies(&["john John John JOHN anna"], 1);
        assert_eq!(words, vec![WordCount { word: "John".to_string(), count: 4 }]);
    }
}
