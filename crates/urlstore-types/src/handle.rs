use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::object_url::ObjectUrl;

/// Current version of the persisted handle state.
pub const HANDLE_STATE_VERSION: u32 = 1;

/// A reference to one stored object.
///
/// The handle's identity is its URL: two handles with equal URLs are
/// interchangeable. Handles are cheap to clone and need no cleanup.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "HandleState", try_from = "HandleState")]
pub struct ObjectHandle {
    url: ObjectUrl,
}

impl ObjectHandle {
    /// Wrap an already validated URL.
    pub fn new(url: ObjectUrl) -> Self {
        Self { url }
    }

    /// Parse `url` and wrap it.
    pub fn parse(url: &str) -> Result<Self, TypeError> {
        ObjectUrl::parse(url).map(Self::new)
    }

    pub fn url(&self) -> &ObjectUrl {
        &self.url
    }

    pub fn into_url(self) -> ObjectUrl {
        self.url
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectHandle({})", self.url)
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.url, f)
    }
}

impl From<ObjectUrl> for ObjectHandle {
    fn from(url: ObjectUrl) -> Self {
        Self::new(url)
    }
}

/// Persisted form of an [`ObjectHandle`].
///
/// Only the URL participates in persistence. The version field lets a reader
/// refuse state written by a newer layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandleState {
    pub version: u32,
    pub url: String,
}

impl From<ObjectHandle> for HandleState {
    fn from(handle: ObjectHandle) -> Self {
        Self {
            version: HANDLE_STATE_VERSION,
            url: handle.url.into(),
        }
    }
}

impl TryFrom<HandleState> for ObjectHandle {
    type Error = TypeError;

    fn try_from(state: HandleState) -> Result<Self, Self::Error> {
        if state.version != HANDLE_STATE_VERSION {
            return Err(TypeError::UnsupportedVersion(state.version));
        }
        Self::parse(&state.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_the_url() {
        let a = ObjectHandle::parse("file:///runs/abc").unwrap();
        let b = ObjectHandle::new(ObjectUrl::parse("file:///runs/abc").unwrap());
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "file:///runs/abc");
    }

    #[test]
    fn state_roundtrip() {
        let handle = ObjectHandle::parse("file:///runs/abc").unwrap();
        let json = serde_json::to_value(&handle).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["url"], "file:///runs/abc");

        let back: ObjectHandle = serde_json::from_value(json).unwrap();
        assert_eq!(back, handle);
    }

    #[test]
    fn state_rejects_unknown_version() {
        let json = serde_json::json!({ "version": 2, "url": "file:///runs/abc" });
        assert!(serde_json::from_value::<ObjectHandle>(json).is_err());

        let state = HandleState { version: 7, url: "file:///runs/abc".into() };
        assert_eq!(
            ObjectHandle::try_from(state).unwrap_err(),
            TypeError::UnsupportedVersion(7)
        );
    }

    #[test]
    fn state_rejects_bad_url() {
        let json = serde_json::json!({ "version": 1, "url": "http://x/y" });
        assert!(serde_json::from_value::<ObjectHandle>(json).is_err());
    }
}
