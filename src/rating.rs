//! content ratings
use {
    serde::{Deserialize, Deserializer, Serialize, Serializer},
    std::{convert::Infallible, fmt, str::FromStr},
};

/// The content rating of a post.
///
/// The api sends the short form (`s`, `q`, `e`), searches accept either form. Anything else is
/// kept verbatim in [`Rating::Other`] so new ratings don't break decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Rating {
    /// Safe for work
    Safe,
    /// Questionable
    Questionable,
    /// Explicit
    Explicit,
    /// A rating this crate doesn't know about, as sent by the api
    Other(String),
}

impl Rating {
    /// every known rating, in order of increasing explicitness
    pub const KNOWN: [Rating; 3] = [Rating::Safe, Rating::Questionable, Rating::Explicit];

    /// the long name used in search queries (`rating:safe`)
    pub fn api_name(&self) -> &str {
        match self {
            Self::Safe => "safe",
            Self::Questionable => "questionable",
            Self::Explicit => "explicit",
            Self::Other(raw) => raw,
        }
    }

    /// the single letter name the api responds with
    pub fn short_name(&self) -> &str {
        match self {
            Self::Safe => "s",
            Self::Questionable => "q",
            Self::Explicit => "e",
            Self::Other(raw) => raw,
        }
    }

    /// parse a rating by either its long or short name, ignoring case
    ///
    /// unlike [`FromStr`], unknown names give `None` instead of [`Rating::Other`]
    pub fn by_any_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "s" | "safe" => Some(Self::Safe),
            "q" | "questionable" => Some(Self::Questionable),
            "e" | "explicit" => Some(Self::Explicit),
            _ => None,
        }
    }

    /// whether the rating is anything but safe
    pub fn is_not_safe(&self) -> bool {
        *self != Self::Safe
    }

    /// whether the rating is one of the three known ones
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl FromStr for Rating {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::by_any_name(s).unwrap_or_else(|| Self::Other(s.to_string())))
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.short_name())
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::by_any_name(&raw).unwrap_or_else(|| Self::Other(raw)))
    }
}
