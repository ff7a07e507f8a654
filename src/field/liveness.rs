//! Liveness tracking between a field and its in-flight upload task
//!
//! The field owns a `MountGuard`. Each upload task gets a `LivenessToken`
//! cloned from it. Once the guard is dropped every token reports dead, and a
//! task that finishes late discards its result instead of delivering it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Held by the field for as long as it is mounted
#[derive(Debug)]
pub struct MountGuard {
    alive: Arc<AtomicBool>,
}

impl MountGuard {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Hand out a token for a task that must not outlive the field
    pub fn token(&self) -> LivenessToken {
        LivenessToken {
            alive: Arc::clone(&self.alive),
        }
    }
}

impl Default for MountGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MountGuard {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
    }
}

/// Held by an upload task; reports whether its field still exists
#[derive(Debug, Clone)]
pub struct LivenessToken {
    alive: Arc<AtomicBool>,
}

impl LivenessToken {
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_dies_with_guard() {
        let guard = MountGuard::new();
        let token = guard.token();
        let other = token.clone();
        assert!(token.is_alive());

        drop(guard);
        assert!(!token.is_alive());
        assert!(!other.is_alive());
    }
}
