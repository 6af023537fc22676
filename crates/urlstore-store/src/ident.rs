use std::sync::atomic::{AtomicU64, Ordering};

/// Source of object basenames.
///
/// The store performs no collision check of its own: two writers that obtain
/// the same token for the same prefix will overwrite each other. An
/// implementation shared by several processes over one root must therefore
/// be unique across all of them, not just within one process.
///
/// Tokens must be usable as a single path segment (no `/`, no reserved
/// characters).
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random UUID v4 tokens rendered as 32 lowercase hex characters.
///
/// 122 random bits make collisions between independent processes negligible.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic `<tag>-<n>` tokens.
///
/// Unique only within one generator instance. Useful for tests and for a
/// single process that owns its root exclusively.
#[derive(Debug)]
pub struct SequentialGenerator {
    tag: String,
    counter: AtomicU64,
}

impl SequentialGenerator {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialGenerator {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n:08}", self.tag)
    }
}
