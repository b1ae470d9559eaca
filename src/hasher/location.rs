/// Hash insertion location within a filename
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HashFsError;

/// Where the content hash is spliced into a filename.
///
/// Examples use `script.min.js` and a hash `H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum HashLocation {
    /// `H-script.min.js`
    Start,
    /// `script-H.min.js`
    FirstPeriod,
    /// `script.min.js-H.js`
    ///
    /// The extension is copied after the hash so browsers and servers that
    /// pick a MIME type from the extension keep working.
    #[default]
    End,
}

impl HashLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashLocation::Start => "start",
            HashLocation::FirstPeriod => "first_period",
            HashLocation::End => "end",
        }
    }

    /// Parse a location name. Accepts `start`/`prefix`, `first_period`/`first-period`
    /// and `end`/`suffix`, case-insensitive.
    pub fn parse_location(s: &str) -> Result<Self, HashFsError> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "start" | "prefix" => Ok(HashLocation::Start),
            "first_period" | "firstperiod" => Ok(HashLocation::FirstPeriod),
            "end" | "suffix" => Ok(HashLocation::End),
            _ => Err(HashFsError::UnsupportedLocation(s.to_string())),
        }
    }
}

impl FromStr for HashLocation {
    type Err = HashFsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_location(s)
    }
}

impl TryFrom<String> for HashLocation {
    type Error = HashFsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse_location(&s)
    }
}

impl fmt::Display for HashLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
