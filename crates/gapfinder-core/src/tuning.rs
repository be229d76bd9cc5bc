//! Heuristic constants used by the analytics engine.
//!
//! The defaults reproduce the pinned production heuristics. They can be
//! overridden from a YAML file so thresholds stay testable and tunable
//! without code changes.
//!
//! ```yaml
//! trend_threshold: 0.002
//! top_videos: 10
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Number of videos reported in `top_performing_videos`.
    pub top_videos: usize,
    /// Number of videos considered for `high_engagement_topics`.
    pub high_engagement_videos: usize,
    /// Keywords extracted per title for a high-engagement topic.
    pub keywords_per_topic: usize,
    /// Number of themes in `video_categories`.
    pub category_count: usize,
    /// Number of entries in `common_keywords`.
    pub common_keyword_count: usize,
    /// Keywords extracted per title when pooling categories.
    pub title_keyword_count: usize,
    /// Minimum dated videos before a trend is fitted.
    pub min_trend_videos: usize,
    /// Absolute slope above which the trend is rising or declining.
    pub trend_threshold: f64,
    /// Fraction of upper-case words above which a title counts as caps.
    pub caps_word_ratio: f64,
    pub gap_views_weight: f64,
    pub gap_engagement_weight: f64,
    /// Engagement rates are fractional; this lifts them to the scale of views.
    pub gap_engagement_scale: f64,
    pub gap_normalizer: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            top_videos: 5,
            high_engagement_videos: 5,
            keywords_per_topic: 3,
            category_count: 5,
            common_keyword_count: 10,
            title_keyword_count: 10,
            min_trend_videos: 5,
            trend_threshold: 0.001,
            caps_word_ratio: 0.5,
            gap_views_weight: 0.7,
            gap_engagement_weight: 0.3,
            gap_engagement_scale: 10_000.0,
            gap_normalizer: 10_000.0,
        }
    }
}

impl AnalyzerConfig {
    /// Check that every tunable is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTuning`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("trend_threshold", self.trend_threshold),
            ("gap_views_weight", self.gap_views_weight),
            ("gap_engagement_weight", self.gap_engagement_weight),
            ("gap_engagement_scale", self.gap_engagement_scale),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidTuning(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }

        if !self.gap_normalizer.is_finite() || self.gap_normalizer <= 0.0 {
            return Err(ConfigError::InvalidTuning(format!(
                "gap_normalizer must be positive, got {}",
                self.gap_normalizer
            )));
        }

        if !(0.0..1.0).contains(&self.caps_word_ratio) {
            return Err(ConfigError::InvalidTuning(format!(
                "caps_word_ratio must be in [0, 1), got {}",
                self.caps_word_ratio
            )));
        }

        if self.min_trend_videos < 2 {
            return Err(ConfigError::InvalidTuning(
                "min_trend_videos must be at least 2".to_string(),
            ));
        }

        Ok(())
    }
}

/// Load and validate analyzer tuning from a YAML file.
///
/// Keys missing from the file keep their defaults.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_analyzer_config(path: &Path) -> Result<AnalyzerConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TuningFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_analyzer_config(&content)
}

fn parse_analyzer_config(content: &str) -> Result<AnalyzerConfig, ConfigError> {
    // An empty document deserializes to unit, not to a defaulted struct.
    if content.trim().is_empty() {
        return Ok(AnalyzerConfig::default());
    }
    let config: AnalyzerConfig = serde_yaml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        AnalyzerConfig::default()
            .validate()
            .expect("defaults should validate");
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg = parse_analyzer_config("trend_threshold: 0.01\ntop_videos: 3\n").expect("parse");
        assert!((cfg.trend_threshold - 0.01).abs() < f64::EPSILON);
        assert_eq!(cfg.top_videos, 3);
        assert_eq!(cfg.category_count, 5);
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(
            parse_analyzer_config("  \n").expect("parse"),
            AnalyzerConfig::default()
        );
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = parse_analyzer_config("trend_treshold: 0.01\n").unwrap_err();
        assert!(matches!(err, ConfigError::TuningFileParse(_)), "got {err:?}");
    }

    #[test]
    fn zero_normalizer_is_rejected() {
        let err = parse_analyzer_config("gap_normalizer: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTuning(ref m) if m.contains("gap_normalizer")));
    }

    #[test]
    fn caps_ratio_of_one_is_rejected() {
        let err = parse_analyzer_config("caps_word_ratio: 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTuning(ref m) if m.contains("caps_word_ratio")));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_analyzer_config(Path::new("/nonexistent/tuning.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::TuningFileIo { .. }));
    }
}
