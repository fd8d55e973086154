use std::fmt;
use std::sync::Arc;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of one page region: the DOM `id` of its `<section>`.
///
/// Shared between the tracker, the nav items and every change
/// notification, so it is reference-counted rather than copied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionId(Arc<str>);

impl SectionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// In-page anchor for this section, e.g. `#about`.
    pub fn anchor(&self) -> String {
        format!("#{}", self.0)
    }

    /// Whether `id` can name an element: non-empty, no whitespace.
    pub fn is_valid(id: &str) -> bool {
        !id.is_empty() && !id.contains(char::is_whitespace)
    }
}

impl PartialEq<str> for SectionId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for SectionId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl std::ops::Deref for SectionId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        SectionId(Arc::from(id))
    }
}

impl From<String> for SectionId {
    fn from(id: String) -> Self {
        SectionId(Arc::from(id))
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for SectionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Config files name sections by id, so reject ids no element can carry.
impl<'de> Deserialize<'de> for SectionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        if !SectionId::is_valid(&id) {
            return Err(D::Error::custom(format!("invalid section id `{id}`")));
        }
        Ok(SectionId::from(id))
    }
}
