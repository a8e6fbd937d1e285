//! utilities used across e6post
use {
    serde::{Deserialize, Deserializer},
    tracing::Level,
};

/// deserialize a nullable value into its default
///
/// the api sends `null` for some fields that are documented as always present (the file url of
/// a restricted post being the usual suspect), so this maps `null` to `T::default()` while still
/// requiring the field itself to be present
#[bearive::argdoc]
#[error = "returns an error if the value is neither null nor a valid `T`"]
pub fn null_as_default<'de, D, T>(
    /// the deserializer
    deserializer: D,
) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// convert a string to a log level
///
/// takes a given string and converts it into a [`tracing::Level`] for later use when setting up
/// tracing in the app (see `app::logging`)
#[bearive::argdoc]
pub fn string_to_log_level(
    /// the string rep of the log level
    lvl: &str,
) -> tracing::Level {
    match lvl.to_lowercase().as_str() {
        "d" | "debug" | "dbg" => Level::DEBUG,
        "t" | "trace" | "trc" => Level::TRACE,
        "e" | "error" | "err" => Level::ERROR,
        "i" | "info" | "inf" => Level::INFO,
        "w" | "warn" | "wrn" => Level::WARN,
        _ => Level::ERROR,
    }
}

/// get the extension of the last path segment of a url, if it has one
pub fn url_extension(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next()?;
    let last = path.rsplit('/').next()?;
    let (_, ext) = last.rsplit_once('.')?;

    if ext.is_empty() { None } else { Some(ext) }
}
