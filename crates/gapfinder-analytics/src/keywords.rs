//! Frequency-ranked keyword extraction.
//!
//! Text is lower-cased, punctuation becomes whitespace, and tokens of two
//! characters or fewer or in the stop-word set are dropped. When a
//! [`PosTagger`] is supplied, candidates are further restricted to nouns,
//! proper nouns, and adjectives. Results are ordered by frequency, ties by
//! first appearance.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::tagger::PosTagger;

/// French stop words. Titles in the corpus are predominantly French.
const STOPWORDS_FR: &[&str] = &[
    "les", "des", "une", "aux", "ces", "cet", "cette", "mon", "ton", "son", "mes", "tes", "ses",
    "nos", "vos", "notre", "votre", "leur", "leurs", "mais", "donc", "car", "que", "qui", "quoi",
    "dont", "lequel", "laquelle", "pas", "plus", "moins", "très", "trop", "peu", "bien", "mal",
    "est", "sont", "était", "étaient", "sera", "seront", "être", "avoir", "avons", "avez", "ont",
    "avait", "avaient", "faire", "fait", "fais", "font", "aller", "vais", "vont", "peut", "peux",
    "peuvent", "veut", "veux", "doit", "dois", "dans", "sur", "sous", "avec", "sans", "pour",
    "par", "entre", "avant", "après", "pendant", "depuis", "ici", "voici", "voilà", "quand",
    "comment", "pourquoi", "combien", "tout", "tous", "toute", "toutes", "autre", "autres",
    "même", "aussi", "encore", "déjà", "toujours", "jamais", "alors", "ainsi", "comme", "parce",
    "puisque", "lorsque", "oui", "non", "elle", "elles", "nous", "vous", "ils", "lui", "moi",
    "toi", "soi", "ceci", "cela", "ça", "chez", "vers", "quel", "quelle", "quels", "quelles",
    "ceux", "celle", "celui", "celles", "dès", "où",
];

/// English stop words, for bilingual titles.
const STOPWORDS_EN: &[&str] = &[
    "the", "and", "but", "nor", "for", "yet", "you", "she", "they", "him", "her", "them", "his",
    "its", "our", "their", "this", "that", "these", "those", "who", "whom", "which", "what",
    "whose", "are", "was", "were", "been", "being", "have", "has", "had", "having", "does",
    "did", "doing", "will", "would", "shall", "should", "can", "could", "may", "might", "must",
    "from", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "out", "off", "over", "under", "again", "further", "here",
    "there", "where", "when", "why", "how", "all", "each", "every", "both", "few", "more", "most",
    "other", "some", "any", "not", "only", "own", "same", "than", "too", "very", "just", "also",
    "now", "then", "once", "always", "never", "because", "until", "while", "your", "yours",
];

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    STOPWORDS_FR
        .iter()
        .chain(STOPWORDS_EN.iter())
        .copied()
        .collect()
});

/// Tokens of this many characters or fewer are never keywords.
const MIN_TOKEN_CHARS: usize = 2;

/// Returns `true` if `token` (already lower-cased) is a stop word.
#[must_use]
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Keyword extractor with an optional part-of-speech backend.
///
/// Stateless per call; cheap to construct.
#[derive(Clone, Copy, Default)]
pub struct KeywordExtractor<'a> {
    tagger: Option<&'a dyn PosTagger>,
}

impl std::fmt::Debug for KeywordExtractor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeywordExtractor")
            .field("tagger", &self.tagger.map(|_| "dyn PosTagger"))
            .finish()
    }
}

impl<'a> KeywordExtractor<'a> {
    #[must_use]
    pub fn new(tagger: Option<&'a dyn PosTagger>) -> Self {
        Self { tagger }
    }

    /// An extractor that ranks by frequency alone.
    #[must_use]
    pub fn frequency_only() -> Self {
        Self { tagger: None }
    }

    /// Return up to `max_keywords` significant terms from `text`, most
    /// frequent first; equal counts keep their first-seen order.
    #[must_use]
    pub fn extract(&self, text: &str, max_keywords: usize) -> Vec<String> {
        if max_keywords == 0 {
            return Vec::new();
        }

        let tokens = tokenize(text);
        let candidates = self.filter_by_tags(&tokens);

        let mut counts: Vec<(&str, usize)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for token in candidates {
            if token.chars().count() <= MIN_TOKEN_CHARS || is_stopword(token) {
                continue;
            }
            match index.get(token) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(token, counts.len());
                    counts.push((token, 1));
                }
            }
        }

        // Stable: ties stay in first-seen order.
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
            .into_iter()
            .take(max_keywords)
            .map(|(word, _)| word.to_string())
            .collect()
    }

    fn filter_by_tags<'t>(&self, tokens: &'t [String]) -> Vec<&'t str> {
        let all = || -> Vec<&'t str> { tokens.iter().map(String::as_str).collect() };
        let Some(tagger) = self.tagger else {
            return all();
        };

        let refs: Vec<&str> = tokens.iter().map(String::as_str).collect();
        let tags = tagger.tag(&refs);
        if tags.len() != refs.len() {
            tracing::warn!(
                tokens = refs.len(),
                tags = tags.len(),
                "tagger returned a mismatched tag count; using frequency-only extraction"
            );
            return all();
        }

        refs.into_iter()
            .zip(tags)
            .filter(|(_, tag)| tag.is_keyword_candidate())
            .map(|(token, _)| token)
            .collect()
    }
}

/// Frequency-only keyword extraction.
#[must_use]
pub fn extract_keywords(text: &str, max_keywords: usize) -> Vec<String> {
    KeywordExtractor::frequency_only().extract(text, max_keywords)
}

/// Lower-case `text`, turn every non-alphanumeric character into whitespace,
/// and split.
fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::PartOfSpeech;

    #[test]
    fn most_frequent_first_with_first_seen_ties() {
        let kw = extract_keywords("le chat mange le poisson le chat court", 2);
        assert_eq!(kw, vec!["chat", "mange"]);
    }

    #[test]
    fn drops_short_tokens_and_stopwords() {
        let kw = extract_keywords("Le vélo et la voiture dans la ville", 10);
        assert_eq!(kw, vec!["vélo", "voiture", "ville"]);
    }

    #[test]
    fn punctuation_becomes_whitespace() {
        let kw = extract_keywords("l'équipe!recette,cuisine", 10);
        assert_eq!(kw, vec!["équipe", "recette", "cuisine"]);
    }

    #[test]
    fn empty_and_zero_limit() {
        assert!(extract_keywords("", 5).is_empty());
        assert!(extract_keywords("   ...  ", 5).is_empty());
        assert!(extract_keywords("cuisine facile", 0).is_empty());
    }

    #[test]
    fn respects_max_keywords() {
        let kw = extract_keywords("alpha beta gamma delta epsilon", 3);
        assert_eq!(kw, vec!["alpha", "beta", "gamma"]);
    }

    struct NounsEndingInE;

    impl PosTagger for NounsEndingInE {
        fn tag(&self, tokens: &[&str]) -> Vec<PartOfSpeech> {
            tokens
                .iter()
                .map(|t| {
                    if t.ends_with('e') {
                        PartOfSpeech::Noun
                    } else {
                        PartOfSpeech::Verb
                    }
                })
                .collect()
        }
    }

    #[test]
    fn tagger_restricts_candidates() {
        let tagger = NounsEndingInE;
        let extractor = KeywordExtractor::new(Some(&tagger));
        let kw = extractor.extract("le chat mange le poisson le chat court", 5);
        assert_eq!(kw, vec!["mange"]);
    }

    struct Broken;

    impl PosTagger for Broken {
        fn tag(&self, _tokens: &[&str]) -> Vec<PartOfSpeech> {
            Vec::new()
        }
    }

    #[test]
    fn mismatched_tagger_falls_back_to_frequency() {
        let tagger = Broken;
        let tagged = KeywordExtractor::new(Some(&tagger)).extract("chat chat poisson", 5);
        assert_eq!(tagged, extract_keywords("chat chat poisson", 5));
    }
}
