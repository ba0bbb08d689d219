//! Record identifiers.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use ulid::{Generator, Ulid};

/// Hands out lowercase ULIDs.
///
/// Ids from one generator are strictly increasing, even within the same
/// millisecond, so rows written in one import batch keep their input order.
#[derive(Clone)]
pub struct IdGenerator {
    inner: Arc<Mutex<Generator>>,
}

impl IdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Generator::new())),
        }
    }

    #[must_use]
    pub fn generate(&self) -> String {
        let mut generator = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        // Overflow of the random part within one millisecond; start fresh.
        let id = generator.generate().unwrap_or_else(|_| Ulid::new());
        id.to_string().to_lowercase()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator").finish_non_exhaustive()
    }
}
