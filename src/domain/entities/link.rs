//! Short link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL mapping.
///
/// `code` is a pure function of `long_url`: the same URL always yields the
/// same code. Distinct URLs may collide on a code; the storage layer
/// overwrites silently in that case (last write wins), which is an accepted
/// design trade-off, not a defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    /// `None` means the entry never expires.
    pub expires_at: Option<DateTime<Utc>>,
}

impl ShortLink {
    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() >= at)
    }
}
