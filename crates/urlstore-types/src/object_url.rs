//! The `file:///` object URL.
//!
//! Object URLs name a stored payload relative to a configured root. The
//! authority component is always empty, so every valid URL starts with the
//! literal `file:///`. Parsing percent-decodes the path, so a root such as
//! `file:///srv/my%20store` or `file:///srv/my store` names the directory
//! `/srv/my store`. URLs the store issues itself come from
//! [`ObjectUrl::from_parts`], which only accepts canonical form, so the string
//! a caller holds is exactly the string the store issued.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::TypeError;

/// The only URL scheme the store understands.
pub const FILE_SCHEME: &str = "file";

/// Mandatory leading form of every object URL (empty authority).
pub const FILE_URL_PREFIX: &str = "file:///";

/// A validated `file:///<relative-path>` URL.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectUrl {
    raw: String,
    path: PathBuf,
}

impl ObjectUrl {
    /// Parse and validate an object URL.
    ///
    /// Fails with [`TypeError::UnsupportedScheme`] for any scheme other than
    /// `file`, and with [`TypeError::InvalidUrl`] for `file:` URLs that lack
    /// the triple slash, carry a query or fragment, contain dot segments, or
    /// decode to something other than plain path segments.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let url = Url::parse(s).map_err(|e| invalid(s, e.to_string()))?;
        if url.scheme() != FILE_SCHEME {
            return Err(TypeError::UnsupportedScheme(url.scheme().to_string()));
        }
        if !s.starts_with(FILE_URL_PREFIX) {
            return Err(invalid(
                s,
                format!("file URLs must start with {FILE_URL_PREFIX}"),
            ));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid(s, "query and fragment are not allowed"));
        }
        if s[FILE_URL_PREFIX.len()..]
            .split('/')
            .any(|segment| matches!(segment, "." | ".."))
        {
            return Err(invalid(s, "dot segments are not allowed"));
        }

        let decoded = url
            .to_file_path()
            .map_err(|()| invalid(s, "not a local file path"))?;
        let path = decoded
            .strip_prefix("/")
            .map_err(|_| invalid(s, "not an absolute file path"))?
            .to_path_buf();
        // %2F decodes to a separator, so check the decoded form as well.
        if !path.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(invalid(s, "path escapes its root"));
        }

        Ok(Self {
            raw: s.to_string(),
            path,
        })
    }

    /// Build the URL for `basename` under the relative `prefix`.
    ///
    /// Trailing slashes on the prefix are ignored. The prefix must be a
    /// non-empty relative path without empty, `.` or `..` segments; the
    /// basename must be a single non-empty path segment. The result must be
    /// in canonical form: prefixes with characters the URL parser would
    /// percent-encode are rejected.
    pub fn from_parts(prefix: &str, basename: &str) -> Result<Self, TypeError> {
        let prefix = validate_prefix(prefix)?;
        let candidate = format!("{FILE_URL_PREFIX}{prefix}/{basename}");
        if !is_plain_segment(basename) || basename.contains('/') {
            return Err(invalid(&candidate, "basename must be a single path segment"));
        }
        let url = Url::parse(&candidate).map_err(|e| invalid(&candidate, e.to_string()))?;
        if url.as_str() != candidate {
            return Err(invalid(&candidate, format!("not in canonical form ({url})")));
        }
        Self::parse(&candidate)
    }

    /// The URL string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The decoded path after `file:///`, suitable for joining onto a root
    /// directory.
    pub fn relative_path(&self) -> &Path {
        &self.path
    }

    /// The directory part of the URL path, or `""` for top-level objects.
    pub fn prefix(&self) -> &str {
        self.tail().rsplit_once('/').map_or("", |(prefix, _)| prefix)
    }

    /// The last path segment.
    pub fn basename(&self) -> &str {
        let tail = self.tail();
        tail.rsplit_once('/').map_or(tail, |(_, name)| name)
    }

    /// Returns `true` if this URL names something inside `prefix`.
    pub fn is_under(&self, prefix: &str) -> bool {
        let prefix = prefix.trim_end_matches('/');
        self.tail()
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
    }

    fn tail(&self) -> &str {
        &self.raw[FILE_URL_PREFIX.len()..]
    }
}

/// Check that `prefix` is a usable relative path prefix and return it without
/// trailing slashes.
///
/// Rejects empty prefixes, absolute paths, and empty, `.` or `..` segments, so
/// that joining the result onto a root can never leave the root.
pub fn validate_prefix(prefix: &str) -> Result<&str, TypeError> {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(invalid(prefix, "empty path prefix"));
    }
    if trimmed.starts_with('/') {
        return Err(invalid(prefix, "path prefix must be relative"));
    }
    if !trimmed.split('/').all(is_plain_segment) {
        return Err(invalid(prefix, "path prefix contains an empty or dot segment"));
    }
    Ok(trimmed)
}

fn is_plain_segment(segment: &str) -> bool {
    !matches!(segment, "" | "." | "..")
}

fn invalid(url: &str, reason: impl Into<String>) -> TypeError {
    TypeError::InvalidUrl {
        url: url.to_string(),
        reason: reason.into(),
    }
}

impl fmt::Debug for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectUrl({})", self.raw)
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ObjectUrl {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ObjectUrl {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ObjectUrl> for String {
    fn from(url: ObjectUrl) -> Self {
        url.raw
    }
}

impl AsRef<str> for ObjectUrl {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}
