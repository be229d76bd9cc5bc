//! Shared data model and configuration for the content gap finder.
//!
//! Everything the analytics engine consumes or produces lives here, along
//! with the traits the channel pipeline uses to talk to its external
//! collaborators (video catalog, document store, text generation).

pub mod analysis;
pub mod app_config;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod gaps;
pub mod quality;
pub mod tuning;
pub mod video;

pub use analysis::{
    CategoryShare, ChannelAnalysis, ContentPatterns, Determined, EngagementAnalysis,
    EngagementTopic, EngagementTrend, PerformanceMetrics, PostingFrequency, TemporalPatterns,
    TitleFormats, TitlePatterns, TopVideo,
};
pub use app_config::{AppConfig, Environment};
pub use collaborators::{
    ChannelInfo, CompetitionAnalysis, IndexedVideo, Suggestion, SuggestionGenerator,
    TopicCorpus, VideoCatalog, VideoSummary,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use gaps::{ContentGap, TopicAggregate};
pub use quality::{Analyzed, Issue, Quality};
pub use tuning::{load_analyzer_config, AnalyzerConfig};
pub use video::{CountError, RawCount, VideoRecord};
