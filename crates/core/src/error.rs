use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("failed reading vocabulary file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid vocabulary json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("city name must not be empty")]
    EmptyCityName,
    #[error("invalid location code `{code}` for city `{city}`: expected three ASCII letters")]
    InvalidLocationCode { city: String, code: String },
    #[error("city `{0}` is listed more than once")]
    DuplicateCity(String),
    #[error("travel class keyword must not be empty")]
    EmptyClassKeyword,
    #[error("relative date phrase must not be empty")]
    EmptyDatePhrase,
}
