//! Components shared by engine subsystems.

use std::fmt;

/// Human readable name of the entity.
///
/// Every event carries its name in this component.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Tag(pub String);

impl Tag {
    /// Creates new tag with given content.
    pub fn new<T>(content: T) -> Self
    where
        T: Into<String>,
    {
        Self(content.into())
    }

    /// Content of this tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}
