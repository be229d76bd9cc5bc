//! Result quality tagging for analyzer output.
//!
//! Analyzers never fail on data-sparse or partially malformed input. Instead
//! every section is wrapped in [`Analyzed`], which records whether the value
//! was computed from fully valid data or had to fall back to defaults for
//! some records.

use std::fmt;

use serde::Serialize;

/// A data problem an analyzer recovered from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    /// A counter could not be coerced and was treated as zero.
    InvalidCount {
        video_id: String,
        field: &'static str,
        raw: String,
    },
    /// `published_at` was present but unparseable; the record was left out of
    /// date-based computations.
    InvalidTimestamp { video_id: String, raw: String },
    /// `published_at` was absent; the record was left out of date-based
    /// computations.
    MissingTimestamp { video_id: String },
    /// A topic aggregate carried a negative or non-finite value that was
    /// replaced by zero.
    InvalidAggregate {
        topic: String,
        field: &'static str,
        value: f64,
    },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::InvalidCount {
                video_id,
                field,
                raw,
            } => write!(f, "video {video_id}: {field} '{raw}' coerced to 0"),
            Issue::InvalidTimestamp { video_id, raw } => {
                write!(f, "video {video_id}: unparseable published_at '{raw}'")
            }
            Issue::MissingTimestamp { video_id } => {
                write!(f, "video {video_id}: missing published_at")
            }
            Issue::InvalidAggregate {
                topic,
                field,
                value,
            } => write!(f, "topic {topic}: {field} {value} replaced by 0"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Quality {
    Complete,
    Degraded { issues: Vec<Issue> },
}

/// An analyzer section together with its [`Quality`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analyzed<T> {
    pub value: T,
    pub quality: Quality,
}

impl<T> Analyzed<T> {
    #[must_use]
    pub fn complete(value: T) -> Self {
        Self {
            value,
            quality: Quality::Complete,
        }
    }

    /// Wrap `value`, marking it degraded when `issues` is non-empty.
    #[must_use]
    pub fn with_issues(value: T, issues: Vec<Issue>) -> Self {
        let quality = if issues.is_empty() {
            Quality::Complete
        } else {
            Quality::Degraded { issues }
        };
        Self { value, quality }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self.quality, Quality::Degraded { .. })
    }

    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        match &self.quality {
            Quality::Complete => &[],
            Quality::Degraded { issues } => issues,
        }
    }

    /// Drop the quality tag.
    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T: Default> Default for Analyzed<T> {
    fn default() -> Self {
        Self::complete(T::default())
    }
}
