//! Duplicate-submission suppression for the auth form handlers.
//!
//! The auth pages are plain HTML forms, so there is no client-side disable
//! of the submit control while a request is outstanding. A double-clicked
//! submit would otherwise launch two parallel provider calls. Each
//! interactive handler claims its operation key here before calling the
//! provider; a second claim while the first is outstanding is rejected.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Auth operations currently in flight, keyed by operation and subject.
///
/// Cheap to clone; all clones share one key set.
#[derive(Clone, Default)]
pub struct InFlightSubmissions {
    keys: Arc<Mutex<HashSet<String>>>,
}

/// Holds an in-flight claim; the key is released when this is dropped.
pub struct SubmissionClaim {
    keys: Arc<Mutex<HashSet<String>>>,
    key: String,
}

fn lock(keys: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    match keys.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl InFlightSubmissions {
    /// Claims `key` for the duration of an operation.
    ///
    /// Returns `None` if an operation with the same key is already
    /// outstanding; the caller suppresses the duplicate instead of
    /// issuing a second provider call.
    #[must_use]
    pub fn claim(&self, key: impl Into<String>) -> Option<SubmissionClaim> {
        let key = key.into();
        if !lock(&self.keys).insert(key.clone()) {
            return None;
        }
        Some(SubmissionClaim {
            keys: Arc::clone(&self.keys),
            key,
        })
    }
}

impl Drop for SubmissionClaim {
    fn drop(&mut self) {
        lock(&self.keys).remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_for_same_key_is_rejected() {
        let submissions = InFlightSubmissions::default();
        let first = submissions.claim("sign-in:a@b.example");
        assert!(first.is_some());
        assert!(submissions.claim("sign-in:a@b.example").is_none());
    }

    #[test]
    fn released_claim_can_be_reclaimed() {
        let submissions = InFlightSubmissions::default();
        let first = submissions.claim("sign-out:tok_1");
        drop(first);
        assert!(submissions.claim("sign-out:tok_1").is_some());
    }

    #[test]
    fn distinct_keys_do_not_interfere() {
        let submissions = InFlightSubmissions::default();
        let _a = submissions.claim("sign-in:a@b.example").expect("first key");
        assert!(submissions.claim("sign-in:c@d.example").is_some());
        assert!(submissions.claim("sign-out:tok_1").is_some());
    }

    #[test]
    fn clones_share_one_key_set() {
        let submissions = InFlightSubmissions::default();
        let clone = submissions.clone();
        let _claim = submissions.claim("sign-in:a@b.example").expect("claim");
        assert!(clone.claim("sign-in:a@b.example").is_none());
    }
}
