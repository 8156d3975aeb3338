use std::fmt;
use std::ops::Deref;

use serde::Serialize;

/// Text that has been through [`normalize`](crate::normalize).
///
/// Only the normalizer constructs it, so holding one is proof that the
/// whitespace rules already ran. Derefs to `str`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub(crate) fn new_unchecked(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Length in Unicode scalar values, the unit used by diff positions.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl Deref for NormalizedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<NormalizedText> for String {
    fn from(value: NormalizedText) -> Self {
        value.0
    }
}

impl PartialEq<str> for NormalizedText {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NormalizedText {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
