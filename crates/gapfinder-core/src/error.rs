use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read tuning file {path}: {source}")]
    TuningFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tuning file: {0}")]
    TuningFileParse(#[from] serde_yaml::Error),

    #[error("invalid analyzer tuning: {0}")]
    InvalidTuning(String),
}
