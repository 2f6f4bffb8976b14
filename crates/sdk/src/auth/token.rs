//! Shared access-token slot.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Holds the current access token.
///
/// Readers get a cheap `Arc<str>` clone of whatever token is installed at the
/// time of the call; the refresh task replaces it atomically. A reader never
/// sees a partially written token.
pub struct TokenHolder {
    current: RwLock<Arc<str>>,
}

impl TokenHolder {
    /// Create an empty holder. Requests needing auth fail until a token is set.
    #[must_use]
    pub fn new() -> Self {
        Self { current: RwLock::new(Arc::from("")) }
    }

    /// Current token, empty if none has been installed.
    #[must_use]
    pub fn get(&self) -> Arc<str> {
        Arc::clone(&self.current.read())
    }

    /// Replace the current token.
    pub fn set(&self, token: impl Into<String>) {
        let token: Arc<str> = Arc::from(token.into());
        *self.current.write() = token;
    }

    /// Whether no token has been installed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }
}

impl Default for TokenHolder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TokenHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenHolder").field("installed", &!self.is_empty()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn starts_empty() {
        let holder = TokenHolder::new();
        assert!(holder.is_empty());
        assert_eq!(&*holder.get(), "");
    }

    #[test]
    fn set_replaces_token() {
        let holder = TokenHolder::new();
        holder.set("first");
        assert_eq!(&*holder.get(), "first");

        let snapshot = holder.get();
        holder.set("second");
        assert_eq!(&*holder.get(), "second");
        // Earlier readers keep the value they observed.
        assert_eq!(&*snapshot, "first");
    }

    #[test]
    fn debug_never_prints_token() {
        let holder = TokenHolder::new();
        holder.set("super-secret-token");
        let rendered = format!("{holder:?}");
        assert!(!rendered.contains("super-secret-token"));
        assert!(rendered.contains("installed: true"));
    }

    #[test]
    fn readers_only_observe_whole_tokens() {
        let holder = Arc::new(TokenHolder::new());
        holder.set("token-0000");

        let writer = {
            let holder = Arc::clone(&holder);
            thread::spawn(move || {
                for i in 1..=2_000 {
                    holder.set(format!("token-{i:04}"));
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let holder = Arc::clone(&holder);
                thread::spawn(move || {
                    for _ in 0..2_000 {
                        let token = holder.get();
                        assert_eq!(token.len(), 10, "torn token: {token}");
                        assert!(token.starts_with("token-"));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(&*holder.get(), "token-2000");
    }
}
