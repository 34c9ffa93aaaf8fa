/// Common error type for the scout core.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScoutError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
    #[error("map backend failure: {0}")]
    Map(String),
}

pub type ScoutResult<T> = Result<T, ScoutError>;
