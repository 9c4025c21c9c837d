//! Invocation tokens for "latest run wins".

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one pipeline invocation. Later invocations compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(u64);

/// Issues increasing tokens and remembers the latest one.
///
/// A run takes a token when it starts and publishes its result only if that
/// token is still the latest, so a slow early run cannot overwrite a newer
/// one. Runs are never cancelled.
#[derive(Debug, Default)]
pub struct Sequencer {
    latest: AtomicU64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new invocation.
    pub fn issue(&self) -> Token {
        Token(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no invocation has started since `token` was issued.
    pub fn is_latest(&self, token: Token) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}
