//! error handling stuff
use thiserror::Error;

#[derive(Debug, Error)]
/// An error
pub enum E6Error {
    /// an IO error
    #[error("i/o error: {0}")]
    IO(#[from] std::io::Error),

    /// a json error, usually a response that doesn't match the models
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// a config builder error
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    /// a toml serialization error
    #[error("toml serialization error: {0}")]
    TOMLSer(#[from] toml::ser::Error),

    /// a toml deserialization error
    #[error("toml deserialization error: {0}")]
    TOMLDe(#[from] toml::de::Error),

    /// one or more config values failed validation
    #[error("{0}")]
    Validation(String),

    /// a report from miette
    #[error("{0}")]
    MietteReport(miette::Report),

    /// a custom error
    #[error("error: {0}")]
    Other(String),
}

impl From<String> for E6Error {
    fn from(value: String) -> Self {
        Self::Other(value)
    }
}

impl From<miette::Report> for E6Error {
    fn from(value: miette::Report) -> Self {
        Self::MietteReport(value)
    }
}

/// A result using [`E6Error`] as the `Err` variant
pub type Result<T, U = E6Error> = miette::Result<T, U>;

/// bail
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::error::E6Error::from(String::from($msg)))
    };

    ($err:expr $(,)?) => {
        return Err($crate::error::E6Error::from($err))
    };

    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::E6Error::from(format!($fmt, $($arg)*)))
    };
}
