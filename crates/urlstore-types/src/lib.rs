//! Foundation types for urlstore.
//!
//! Every other urlstore crate depends on `urlstore-types`.
//!
//! # Key Types
//!
//! - [`ObjectUrl`] — validated `file:///<relative-path>` URL naming one stored object
//! - [`ObjectHandle`] — lightweight reference to a stored object; its identity is its URL
//! - [`Value`] — dynamic self-describing value that the codecs serialize
//! - [`Mapping`] — ordered key-value map, the payload of a mapping snapshot
//! - [`Shape`] — variant tag of a [`Value`], used for typed reads

pub mod error;
pub mod handle;
pub mod object_url;
pub mod value;

pub use error::TypeError;
pub use handle::{HandleState, ObjectHandle, HANDLE_STATE_VERSION};
pub use object_url::{validate_prefix, ObjectUrl, FILE_SCHEME, FILE_URL_PREFIX};
pub use value::{Mapping, Shape, Value};
