//! Title structure and keyword-based topic categorization.

use std::collections::HashMap;

use gapfinder_core::{
    Analyzed, AnalyzerConfig, CategoryShare, ContentPatterns, TitleFormats, TitlePatterns,
    VideoRecord,
};

use crate::keywords::KeywordExtractor;

/// Words that mark a title as a question even without a `?`.
const QUESTION_CUES: &[&str] = &[
    "comment", "pourquoi", "quand", "quel", "quelle", "quels", "quelles", "combien", "où",
    "quoi", "how", "why", "what", "when", "where", "who", "which",
];

/// Unicode blocks treated as emoji.
const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1F1E6, 0x1F1FF), // regional indicators (flags)
    (0x1F300, 0x1F5FF), // symbols & pictographs
    (0x1F600, 0x1F64F), // emoticons
    (0x1F680, 0x1F6FF), // transport & map
    (0x1F900, 0x1F9FF), // supplemental symbols & pictographs
    (0x1FA70, 0x1FAFF), // symbols & pictographs extended-A
    (0x2600, 0x26FF),   // miscellaneous symbols
    (0x2700, 0x27BF),   // dingbats
];

const BRACKETS: &[char] = &['(', ')', '[', ']', '{', '}'];

/// Analyze title formats, themes, and common keywords.
#[must_use]
pub fn analyze_content_patterns(
    videos: &[VideoRecord],
    extractor: &KeywordExtractor<'_>,
    config: &AnalyzerConfig,
) -> Analyzed<ContentPatterns> {
    let titles: Vec<&str> = videos.iter().map(|v| v.title.as_str()).collect();
    let all_titles = titles.join(" ");

    Analyzed::complete(ContentPatterns {
        common_keywords: extractor.extract(&all_titles, config.common_keyword_count),
        title_patterns: analyze_titles(&titles, config),
        video_categories: categorize(&titles, extractor, config),
    })
}

/// Word-count and format-class statistics over a set of titles.
#[must_use]
pub fn analyze_titles(titles: &[&str], config: &AnalyzerConfig) -> TitlePatterns {
    if titles.is_empty() {
        return TitlePatterns::default();
    }

    let total_words: usize = titles.iter().map(|t| t.split_whitespace().count()).sum();
    let share = |pred: &dyn Fn(&str) -> bool| -> f64 {
        let matching = titles.iter().filter(|t| pred(t)).count();
        percentage(matching, titles.len())
    };

    TitlePatterns {
        average_length: ratio(total_words, titles.len()),
        common_formats: TitleFormats {
            questions: share(&is_question),
            numbers: share(&has_digit),
            brackets: share(&has_bracket),
            emojis: share(&has_emoji),
            caps: share(&|t: &str| is_mostly_caps(t, config.caps_word_ratio)),
        },
    }
}

fn is_question(title: &str) -> bool {
    if title.contains('?') {
        return true;
    }
    title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| QUESTION_CUES.contains(&w))
}

fn has_digit(title: &str) -> bool {
    title.chars().any(|c| c.is_ascii_digit())
}

fn has_bracket(title: &str) -> bool {
    title.contains(BRACKETS)
}

fn has_emoji(title: &str) -> bool {
    title.chars().any(|c| {
        let cp = u32::from(c);
        EMOJI_RANGES
            .iter()
            .any(|&(start, end)| (start..=end).contains(&cp))
    })
}

/// A title is caps when upper-case words make up more than `threshold` of
/// its words. Words without letters (numbers, `[2024]`) count toward the
/// total but are never upper-case.
fn is_mostly_caps(title: &str, threshold: f64) -> bool {
    let words: Vec<&str> = title.split_whitespace().collect();
    if words.is_empty() {
        return false;
    }
    let upper = words
        .iter()
        .filter(|w| {
            w.chars().any(char::is_alphabetic) && !w.chars().any(char::is_lowercase)
        })
        .count();
    ratio(upper, words.len()) > threshold
}

/// Pool per-title keywords and report the most frequent as themes.
fn categorize(
    titles: &[&str],
    extractor: &KeywordExtractor<'_>,
    config: &AnalyzerConfig,
) -> Vec<CategoryShare> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut total = 0usize;

    for title in titles {
        for keyword in extractor.extract(title, config.title_keyword_count) {
            total += 1;
            if let Some(&i) = index.get(&keyword) {
                counts[i].1 += 1;
            } else {
                index.insert(keyword.clone(), counts.len());
                counts.push((keyword, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(config.category_count)
        .map(|(theme, count)| CategoryShare {
            theme,
            percentage: percentage(count, total),
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// `part / whole × 100`, rounded to one decimal; 0 when `whole` is 0.
pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    (ratio(part, whole) * 1000.0).round() / 10.0
}
