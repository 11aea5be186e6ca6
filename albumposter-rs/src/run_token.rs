use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one generation run. Later runs carry larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunToken(u64);

impl RunToken {
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Hands out run tokens and remembers the most recent one.
#[derive(Debug, Default)]
pub struct RunCounter {
    latest: AtomicU64,
}

impl RunCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> RunToken {
        RunToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Whether no run has started since `token` was issued.
    pub fn is_current(&self, token: RunToken) -> bool {
        self.latest() == token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_increase() {
        let counter = RunCounter::new();
        let first = counter.begin();
        assert!(counter.is_current(first));

        let second = counter.begin();
        assert!(second > first);
        assert!(!counter.is_current(first));
        assert!(counter.is_current(second));
        assert_eq!(counter.latest(), 2);
    }
}
