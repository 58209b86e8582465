use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ResolveError;

pub const SSM_NON_SECURE_PREFIX: &str = "ssm:";
pub const SSM_SECURE_PREFIX: &str = "ssm-secure:";

const STRING_TYPE: &str = "String";
const STRING_LIST_TYPE: &str = "StringList";
const SECURE_STRING_TYPE: &str = "SecureString";

/// Resolved parameters keyed by the reference that asked for them.
pub type ResolutionMap = BTreeMap<ParameterReference, ParameterInfo>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReferenceKind {
    Plain,
    Secure,
}

impl ReferenceKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            ReferenceKind::Plain => SSM_NON_SECURE_PREFIX,
            ReferenceKind::Secure => SSM_SECURE_PREFIX,
        }
    }
}

/// A placeholder target such as `ssm:/a/b/c` or `ssm-secure:db-password`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParameterReference {
    kind: ReferenceKind,
    name: String,
}

impl ParameterReference {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::Plain,
            name: name.into(),
        }
    }

    pub fn secure(name: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::Secure,
            name: name.into(),
        }
    }

    pub fn parse(reference: &str) -> Result<Self, ResolveError> {
        let reference = reference.trim();
        let (kind, name) = if let Some(name) = reference.strip_prefix(SSM_SECURE_PREFIX) {
            (ReferenceKind::Secure, name)
        } else if let Some(name) = reference.strip_prefix(SSM_NON_SECURE_PREFIX) {
            (ReferenceKind::Plain, name)
        } else {
            return Err(ResolveError::InvalidReference(reference.to_string()));
        };

        if name.is_empty() {
            return Err(ResolveError::InvalidReference(reference.to_string()));
        }

        Ok(Self {
            kind,
            name: name.to_string(),
        })
    }

    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    /// The name as the parameter store knows it.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_secure(&self) -> bool {
        self.kind == ReferenceKind::Secure
    }
}

impl fmt::Display for ParameterReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.name)
    }
}

impl FromStr for ParameterReference {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParameterType {
    String,
    StringList,
    SecureString,
    Other(String),
}

impl ParameterType {
    pub fn is_secure(&self) -> bool {
        matches!(self, ParameterType::SecureString)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ParameterType::String => STRING_TYPE,
            ParameterType::StringList => STRING_LIST_TYPE,
            ParameterType::SecureString => SECURE_STRING_TYPE,
            ParameterType::Other(other) => other,
        }
    }
}

impl From<&str> for ParameterType {
    fn from(value: &str) -> Self {
        match value {
            STRING_TYPE => ParameterType::String,
            STRING_LIST_TYPE => ParameterType::StringList,
            SECURE_STRING_TYPE => ParameterType::SecureString,
            other => ParameterType::Other(other.to_string()),
        }
    }
}

impl From<String> for ParameterType {
    fn from(value: String) -> Self {
        ParameterType::from(value.as_str())
    }
}

impl From<ParameterType> for String {
    fn from(value: ParameterType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterInfo {
    name: String,
    #[serde(rename = "type")]
    parameter_type: ParameterType,
    value: String,
}

impl ParameterInfo {
    pub fn new(
        name: impl Into<String>,
        parameter_type: ParameterType,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            parameter_type,
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameter_type(&self) -> &ParameterType {
        &self.parameter_type
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

// Values may be decrypted secrets.
impl fmt::Debug for ParameterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterInfo")
            .field("name", &self.name)
            .field("parameter_type", &self.parameter_type)
            .field("value", &"<redacted>")
            .finish()
    }
}
