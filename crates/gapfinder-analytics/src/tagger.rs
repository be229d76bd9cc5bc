//! Part-of-speech tagging backends for keyword extraction.
//!
//! A tagger is optional. It is built once at process start and shared
//! read-only; the extractor falls back to frequency-only ranking when none is
//! supplied.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use thiserror::Error;

/// Coarse universal part-of-speech classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartOfSpeech {
    Noun,
    ProperNoun,
    Adjective,
    Verb,
    Other,
}

impl PartOfSpeech {
    /// Parse a Universal Dependencies tag (`NOUN`, `PROPN`, `ADJ`, ...).
    #[must_use]
    pub fn from_ud_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "NOUN" => PartOfSpeech::Noun,
            "PROPN" => PartOfSpeech::ProperNoun,
            "ADJ" => PartOfSpeech::Adjective,
            "VERB" | "AUX" => PartOfSpeech::Verb,
            _ => PartOfSpeech::Other,
        }
    }

    #[must_use]
    pub fn is_keyword_candidate(self) -> bool {
        matches!(
            self,
            PartOfSpeech::Noun | PartOfSpeech::ProperNoun | PartOfSpeech::Adjective
        )
    }
}

/// Tags a token sequence.
///
/// Implementations must return exactly one tag per token; a mismatched
/// length makes the extractor ignore the tags for that call.
pub trait PosTagger: Send + Sync {
    fn tag(&self, tokens: &[&str]) -> Vec<PartOfSpeech>;
}

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read lexicon {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("lexicon line {line}: expected `word<TAB>TAG`, got {content:?}")]
    InvalidLine { line: usize, content: String },
}

/// Dictionary tagger: looks each token up in a word → tag table.
///
/// Unknown tokens are tagged [`PartOfSpeech::Other`].
#[derive(Debug, Clone, Default)]
pub struct LexiconTagger {
    entries: HashMap<String, PartOfSpeech>,
}

impl LexiconTagger {
    /// Load a tab-separated lexicon (`word<TAB>TAG` per line, `#` comments).
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError::Io`] if the file cannot be read and
    /// [`LexiconError::InvalidLine`] for malformed lines.
    pub fn from_path(path: &Path) -> Result<Self, LexiconError> {
        let io_err = |source| LexiconError::Io {
            path: path.display().to_string(),
            source,
        };
        let file = std::fs::File::open(path).map_err(io_err)?;
        Self::from_reader(std::io::BufReader::new(file)).map_err(|e| match e {
            LexiconError::Io { source, .. } => io_err(source),
            other => other,
        })
    }

    /// Parse a lexicon from any buffered reader.
    ///
    /// # Errors
    ///
    /// See [`LexiconTagger::from_path`].
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, LexiconError> {
        let mut entries = HashMap::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| LexiconError::Io {
                path: "<reader>".to_string(),
                source,
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((word, tag)) = trimmed.split_once('\t') else {
                return Err(LexiconError::InvalidLine {
                    line: idx + 1,
                    content: line,
                });
            };
            let word = word.trim();
            if word.is_empty() {
                return Err(LexiconError::InvalidLine {
                    line: idx + 1,
                    content: line,
                });
            }
            entries.insert(word.to_lowercase(), PartOfSpeech::from_ud_tag(tag));
        }
        Ok(Self { entries })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, tokens: &[&str]) -> Vec<PartOfSpeech> {
        tokens
            .iter()
            .map(|t| {
                self.entries
                    .get(*t)
                    .copied()
                    .unwrap_or(PartOfSpeech::Other)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEXICON: &str = "# sample\nchat\tNOUN\nmange\tVERB\n\npoisson\tNOUN\nrapide\tADJ\nparis\tPROPN\n";

    #[test]
    fn parses_lexicon_and_tags_tokens() {
        let tagger = LexiconTagger::from_reader(LEXICON.as_bytes()).expect("parse");
        assert_eq!(tagger.len(), 5);
        let tags = tagger.tag(&["chat", "mange", "inconnu", "paris"]);
        assert_eq!(
            tags,
            vec![
                PartOfSpeech::Noun,
                PartOfSpeech::Verb,
                PartOfSpeech::Other,
                PartOfSpeech::ProperNoun
            ]
        );
    }

    #[test]
    fn rejects_line_without_tab() {
        let err = LexiconTagger::from_reader("chat NOUN\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LexiconError::InvalidLine { line: 1, .. }));
    }

    #[test]
    fn extractor_with_lexicon_keeps_nouns_and_adjectives() {
        let tagger = LexiconTagger::from_reader(LEXICON.as_bytes()).expect("parse");
        let extractor = crate::keywords::KeywordExtractor::new(Some(&tagger));
        let kw = extractor.extract("Le chat mange un poisson rapide", 10);
        assert_eq!(kw, vec!["chat", "poisson", "rapide"]);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = LexiconTagger::from_path(Path::new("/nonexistent/lexicon.tsv")).unwrap_err();
        assert!(matches!(err, LexiconError::Io { ref path, .. } if path.contains("lexicon.tsv")));
    }
}
