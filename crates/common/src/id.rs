//! ID generation utilities.

use ulid::Ulid;

/// Length of a ULID in its canonical text form.
const ULID_LEN: usize = 26;

/// ID generator for polls and their options.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Shorter than UUIDs when represented as strings
    /// - Opaque to clients, who only echo them back
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Check that `id` is a well-formed identifier without touching storage.
    #[must_use]
    pub fn is_valid(id: &str) -> bool {
        id.len() == ULID_LEN && Ulid::from_string(&id.to_ascii_uppercase()).is_ok()
    }
}
