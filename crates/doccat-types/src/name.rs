//! Validated file names.
//!
//! Client-supplied names are used directly as keys in the blob store
//! directory, so they must never be able to escape it. A valid name:
//! - Must be non-empty and at most [`MAX_FILE_NAME_LEN`] bytes
//! - Must not be `.` or `..`
//! - Must not start with `.` (reserved for in-flight upload files)
//! - Must not contain `/`, `\`, NUL, or any other control character

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TypesError, TypesResult};

/// Longest accepted name, in bytes. Matches the common filesystem limit.
pub const MAX_FILE_NAME_LEN: usize = 255;

/// A file name that is safe to join onto a storage root.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FileName(String);

impl FileName {
    /// Validate `name` and wrap it.
    ///
    /// # Examples
    ///
    /// ```
    /// use doccat_types::FileName;
    ///
    /// assert!(FileName::parse("report.pdf").is_ok());
    /// assert!(FileName::parse("../etc/passwd").is_err());
    /// assert!(FileName::parse("").is_err());
    /// ```
    pub fn parse(name: impl Into<String>) -> TypesResult<Self> {
        let name = name.into();
        validate(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

fn invalid(name: &str, reason: impl Into<String>) -> TypesError {
    TypesError::InvalidFileName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

fn validate(name: &str) -> TypesResult<()> {
    if name.is_empty() {
        return Err(invalid(name, "file name must not be empty"));
    }

    if name.len() > MAX_FILE_NAME_LEN {
        return Err(invalid(
            name,
            format!("longer than {MAX_FILE_NAME_LEN} bytes"),
        ));
    }

    if name == "." || name == ".." {
        return Err(invalid(name, "must not be a directory reference"));
    }

    if name.starts_with('.') {
        return Err(invalid(name, "must not start with '.'"));
    }

    if let Some(ch) = name
        .chars()
        .find(|c| *c == '/' || *c == '\\' || c.is_control())
    {
        return Err(invalid(name, format!("contains forbidden character: {ch:?}")));
    }

    Ok(())
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FileName {
    type Error = TypesError;

    fn try_from(value: String) -> TypesResult<Self> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for FileName {
    type Error = TypesError;

    fn try_from(value: &str) -> TypesResult<Self> {
        Self::parse(value)
    }
}

impl From<FileName> for String {
    fn from(name: FileName) -> Self {
        name.0
    }
}
