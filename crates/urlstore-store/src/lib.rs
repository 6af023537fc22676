//! URL-addressed, write-once object storage.
//!
//! Callers hand the store a payload (raw bytes, or a [`Value`] that the
//! configured [`Codec`] serializes); the store places it under a freshly
//! generated name and returns an [`ObjectHandle`] whose `file:///` URL later
//! resolves back to the same bytes.
//!
//! ```text
//! value -> codec.encode -> bytes -> write(bytes, prefix) -> file:///<prefix>/<id>
//! file:///<prefix>/<id> -> resolve -> <root>/<prefix>/<id> -> bytes -> codec.decode -> value
//! ```
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`LocalObjectStore`] -- objects as files under a configured root directory
//! - [`InMemoryObjectStore`] -- `BTreeMap`-based store for tests and embedding
//!
//! # Collaborators
//!
//! - [`ConfigProvider`] -- supplies the root URL and default prefix ([`StoreConfig`] from TOML)
//! - [`IdGenerator`] -- supplies object basenames ([`UuidGenerator`])
//! - [`Codec`] -- value serialization ([`JsonCodec`], [`BincodeCodec`])
//!
//! # Design Rules
//!
//! 1. Objects are written once and never updated in place.
//! 2. A handle is returned only after the whole payload is written.
//! 3. Uniqueness of names comes from the [`IdGenerator`] alone; there is no locking.
//! 4. Deletion removes a whole prefix subtree. A missing prefix is tolerated
//!    or reported depending on [`DeleteMode`].
//! 5. I/O errors other than "not found" are propagated unchanged.

pub mod codec;
pub mod config;
pub mod error;
pub mod ident;
pub mod local;
pub mod location;
pub mod memory;
pub mod resolver;
pub mod snapshot;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use codec::{BincodeCodec, Codec, JsonCodec};
pub use config::{ConfigProvider, StoreConfig, WriteMode, PREFIX_KEY, ROOT_URL_KEY, WRITE_MODE_KEY};
pub use error::{StoreError, StoreResult};
pub use ident::{IdGenerator, SequentialGenerator, UuidGenerator};
pub use local::LocalObjectStore;
pub use location::ObjectLocation;
pub use memory::InMemoryObjectStore;
pub use resolver::{object_path, resolve, resolve_root};
pub use snapshot::MappingSnapshot;
pub use traits::{DeleteMode, ObjectStore};
pub use urlstore_types::{Mapping, ObjectHandle, ObjectUrl, Shape, Value};
