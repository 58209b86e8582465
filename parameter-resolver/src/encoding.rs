use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::policy::ParseOptionError;

/// Document format that resolved values are written into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputEncoding {
    #[default]
    Text,
    Xml,
    Yml,
    Json,
}

impl OutputEncoding {
    /// Encodes a resolved value for the target format.
    ///
    /// Every format currently inserts the value verbatim.
    pub fn encode<'a>(&self, value: &'a str) -> &'a str {
        match self {
            OutputEncoding::Text
            | OutputEncoding::Xml
            | OutputEncoding::Yml
            | OutputEncoding::Json => value,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputEncoding::Text => "txt",
            OutputEncoding::Xml => "xml",
            OutputEncoding::Yml => "yml",
            OutputEncoding::Json => "json",
        }
    }
}

impl fmt::Display for OutputEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputEncoding {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "txt" | "text" => Ok(OutputEncoding::Text),
            "xml" => Ok(OutputEncoding::Xml),
            "yml" | "yaml" => Ok(OutputEncoding::Yml),
            "json" => Ok(OutputEncoding::Json),
            other => Err(ParseOptionError::OutputEncoding(other.to_string())),
        }
    }
}
