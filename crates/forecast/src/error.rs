use std::path::PathBuf;

/// Failures of a weather lookup or of the favorites file.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("please enter a city name")]
    EmptyQuery,
    #[error("could not find coordinates for {0:?}")]
    CityNotFound(String),
    #[error("error fetching weather for {city}: {reason}")]
    Api { city: String, reason: String },
    #[error("could not access {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed forecast response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("could not encode favorites: {0}")]
    Encode(#[from] ron::Error),
}
