use std::error::Error as StdError;

#[derive(Debug)]
pub enum Error {
    CVError(opencv::Error),
    ModelError(ort::Error),
    ConfigError(config::ConfigError),
    InvalidFrameError(String),
    InvalidModelIOError(String),
    UnknownError(Box<dyn StdError>),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::CVError(err) => write!(f, "opencv error: {}", err),
            Error::ModelError(err) => write!(f, "model error: {}", err),
            Error::ConfigError(err) => write!(f, "configuration error: {}", err),
            Error::InvalidFrameError(msg) => write!(f, "invalid frame: {}", msg),
            Error::InvalidModelIOError(msg) => write!(f, "invalid model io: {}", msg),
            Error::UnknownError(err) => write!(f, "unknown error: {}", err),
        }
    }
}

impl StdError for Error {}

impl Error {
    pub fn as_unknown_error(err: impl StdError + 'static) -> Self {
        Self::UnknownError(Box::new(err))
    }
}
