//! Well-known key layout inside the coordination store.

/// Root of everything the reboot lock stores.
pub const KEY_PREFIX: &str = "coreos.com/updateengine/rebootlock";

/// Location of the semaphore record.
pub const SEMAPHORE_KEY: &str = "coreos.com/updateengine/rebootlock/semaphore";

/// Reserved for per-holder bookkeeping by higher layers. Never written here.
pub const HOLDERS_PREFIX: &str = "coreos.com/updateengine/rebootlock/holders";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_share_prefix() {
        assert!(SEMAPHORE_KEY.starts_with(KEY_PREFIX));
        assert!(HOLDERS_PREFIX.starts_with(KEY_PREFIX));
    }

    #[test]
    fn test_semaphore_key_outside_holders() {
        assert!(!SEMAPHORE_KEY.starts_with(HOLDERS_PREFIX));
        assert!(!HOLDERS_PREFIX.starts_with(SEMAPHORE_KEY));
    }
}
