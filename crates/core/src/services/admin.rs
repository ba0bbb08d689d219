//! Administrator allow-list.

use std::collections::HashSet;
use std::sync::Arc;

use awards_common::config::AdminConfig;

/// Decides which authenticated users may review nominations.
///
/// Emails are compared case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct AdminDirectory {
    emails: Arc<HashSet<String>>,
}

impl AdminDirectory {
    /// Create a directory from a list of emails.
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails = emails
            .into_iter()
            .map(|e| normalize(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            emails: Arc::new(emails),
        }
    }

    /// Create a directory from configuration.
    #[must_use]
    pub fn from_config(config: &AdminConfig) -> Self {
        Self::new(&config.emails)
    }

    /// Check whether `email` belongs to an administrator.
    #[must_use]
    pub fn is_admin(&self, email: &str) -> bool {
        self.emails.contains(&normalize(email))
    }

    /// Number of administrators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.emails.len()
    }

    /// Whether nobody may review.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}
