//! Domain identifier types with validation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Collection (audience list) identifier
///
/// The source API groups members into lists; every sync cycle and every
/// watermark is keyed by one of these.
///
/// # Examples
///
/// ```
/// use listsync::domain::ids::CollectionId;
/// use std::str::FromStr;
///
/// let id = CollectionId::from_str("a1b2c3d4e5").unwrap();
/// assert_eq!(id.as_str(), "a1b2c3d4e5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionId(String);

impl CollectionId {
    /// Creates a new CollectionId
    ///
    /// Rejects blank identifiers and identifiers containing `/` or whitespace,
    /// since the id is interpolated into request paths and store keys.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Collection ID cannot be empty".to_string());
        }
        if id.contains('/') || id.chars().any(char::is_whitespace) {
            return Err(format!(
                "Collection ID must not contain '/' or whitespace, got: {id:?}"
            ));
        }
        Ok(Self(id))
    }

    /// Returns the collection ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CollectionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CollectionId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CollectionId> for String {
    fn from(id: CollectionId) -> Self {
        id.0
    }
}

impl AsRef<str> for CollectionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
